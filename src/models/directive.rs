use serde::Serialize;

use crate::models::{BookingState, DispatchStatus, Operation};

/// What the caller should say or do next, plus the status behind it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Directive {
    pub operation: Operation,
    pub state: BookingState,
    pub instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<DispatchStatus>,
}

impl Directive {
    pub fn new(operation: Operation, state: BookingState, instruction: impl Into<String>) -> Self {
        Self {
            operation,
            state,
            instruction: instruction.into(),
            notification: None,
        }
    }

    pub fn with_notification(mut self, status: DispatchStatus) -> Self {
        self.notification = Some(status);
        self
    }
}
