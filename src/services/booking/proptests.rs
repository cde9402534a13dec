//! Property-based tests for the booking machine
//!
//! Arbitrary tool-call sequences, including out-of-order and empty-argument
//! calls, must never break the record invariants.

use std::sync::Arc;

use proptest::prelude::*;

use super::BookingMachine;
use crate::errors::BookingError;
use crate::models::{BookingState, Operation, ToolCall};
use crate::services::notification::testing::RecordingDispatcher;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-zA-Z0-9@. ]{1,20}",
    ]
}

fn arb_tool_call() -> impl Strategy<Value = ToolCall> {
    prop_oneof![
        Just(ToolCall::StartBooking),
        (arb_text(), arb_text())
            .prop_map(|(name, email)| ToolCall::SaveContactDetails { name, email }),
        arb_text().prop_map(|time| ToolCall::SaveTime { time }),
        any::<bool>().prop_map(|confirmed| ToolCall::FinalizeBooking { confirmed }),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Every accepted call follows an edge of the table, apart from contact
    // updates while scheduling; every rejected call leaves the record untouched.
    #[test]
    fn prop_transitions_follow_edge_table(calls in proptest::collection::vec(arb_tool_call(), 0..30)) {
        let rt = runtime();
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let mut machine = BookingMachine::new("prop", dispatcher.clone());

        for call in calls {
            let before = machine.record().clone();
            let expected_op = call.operation();
            match rt.block_on(machine.apply(call)) {
                Ok(directive) => {
                    let contact_update = expected_op == Operation::RecordContact
                        && before.state() == BookingState::Scheduling
                        && machine.state() == BookingState::Scheduling;
                    prop_assert!(contact_update || before.state().can_transition_to(machine.state()),
                        "illegal edge {} -> {}", before.state(), machine.state());
                    prop_assert_eq!(directive.state, machine.state());
                    prop_assert_eq!(directive.operation, expected_op);
                }
                Err(BookingError::InvalidTransition { operation, state }) => {
                    prop_assert_eq!(operation, expected_op);
                    prop_assert_eq!(state, before.state());
                    prop_assert_eq!(machine.record(), &before);
                }
                Err(BookingError::MissingField { .. }) => {
                    prop_assert_eq!(machine.record(), &before);
                }
            }
        }
    }

    // Field presence guards the states that depend on them.
    #[test]
    fn prop_fields_present_before_dependent_states(calls in proptest::collection::vec(arb_tool_call(), 0..30)) {
        let rt = runtime();
        let mut machine = BookingMachine::new("prop", Arc::new(RecordingDispatcher::new()));

        for call in calls {
            let _ = rt.block_on(machine.apply(call));
            let record = machine.record();
            match record.state() {
                BookingState::Discovery | BookingState::CollectInfo => {}
                BookingState::Scheduling => {
                    prop_assert!(non_empty(record.name()) && non_empty(record.email()));
                }
                BookingState::Confirmation | BookingState::Terminal => {
                    prop_assert!(non_empty(record.name()) && non_empty(record.email()));
                    prop_assert!(non_empty(record.time()));
                }
            }
        }
    }

    // Exactly one dispatch per session that reaches Terminal, none otherwise,
    // and nothing moves the machine out of Terminal.
    #[test]
    fn prop_terminal_absorbing_single_dispatch(calls in proptest::collection::vec(arb_tool_call(), 0..40)) {
        let rt = runtime();
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let mut machine = BookingMachine::new("prop", dispatcher.clone());
        let mut terminal_record = None;

        for call in calls {
            let result = rt.block_on(machine.apply(call));
            if let Some(record) = &terminal_record {
                prop_assert!(result.is_err());
                prop_assert_eq!(machine.record(), record);
            } else if machine.state().is_terminal() {
                terminal_record = Some(machine.record().clone());
            }
        }

        let calls = dispatcher.recorded();
        match terminal_record {
            Some(record) => {
                prop_assert_eq!(calls.len(), 1);
                let (email, name, time) = &calls[0];
                prop_assert_eq!(Some(email.as_str()), record.email());
                prop_assert_eq!(Some(name.as_str()), record.name());
                prop_assert_eq!(Some(time.as_str()), record.time());
            }
            None => prop_assert!(calls.is_empty()),
        }
    }
}
