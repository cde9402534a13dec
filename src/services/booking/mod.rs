use std::sync::Arc;

use crate::errors::BookingError;
use crate::models::{BookingRecord, BookingState, Directive, DispatchStatus, Operation, ToolCall};
use crate::services::notification::NotificationDispatcher;

#[cfg(test)]
mod proptests;

const ASK_CONTACT: &str = "Intent received. Now ask for their Name and Email.";
const ASK_TIME: &str = "Contact saved. Now ask for the preferred Date and Time.";
const CONTACT_UPDATED: &str = "Contact updated. Now ask for the preferred Date and Time.";
const CONFIRMED_SENT: &str = "Booking Confirmed. Email sent. Say goodbye.";
const CONFIRMED_NOT_SENT: &str = "Booking Confirmed. The confirmation email could not be sent, \
     but the appointment stands. Say goodbye.";
const DECLINED: &str = "User declined. Apologize and ask for the correct Date/Time again.";

/// Drives one session's booking from discovery to a confirmed appointment.
///
/// Every mutation of the record goes through one of the four operations. An
/// operation that fails leaves the record exactly as it was.
pub struct BookingMachine {
    session_id: String,
    record: BookingRecord,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl BookingMachine {
    pub fn new(session_id: impl Into<String>, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        Self {
            session_id: session_id.into(),
            record: BookingRecord::default(),
            dispatcher,
        }
    }

    pub fn state(&self) -> BookingState {
        self.record.state
    }

    pub fn record(&self) -> &BookingRecord {
        &self.record
    }

    pub fn begin_booking(&mut self) -> Result<Directive, BookingError> {
        let op = Operation::BeginBooking;
        self.ensure(op, BookingState::CollectInfo)?;
        self.set_state(BookingState::CollectInfo);
        Ok(Directive::new(op, self.state(), ASK_CONTACT))
    }

    /// Stores contact details and moves on to scheduling. While scheduling,
    /// re-supplied details overwrite the stored ones and the state stays put.
    pub fn record_contact(&mut self, name: &str, email: &str) -> Result<Directive, BookingError> {
        let op = Operation::RecordContact;
        let resupplied = self.state() == BookingState::Scheduling;
        if !resupplied {
            self.ensure(op, BookingState::Scheduling)?;
        }
        let name = self.required(op, "name", name)?;
        let email = self.required(op, "email", email)?;

        self.record.name = Some(name.to_string());
        self.record.email = Some(email.to_string());

        if resupplied {
            tracing::info!(session_id = %self.session_id, "contact details updated");
            return Ok(Directive::new(op, self.state(), CONTACT_UPDATED));
        }
        self.set_state(BookingState::Scheduling);
        Ok(Directive::new(op, self.state(), ASK_TIME))
    }

    pub fn record_time(&mut self, time: &str) -> Result<Directive, BookingError> {
        let op = Operation::RecordTime;
        self.ensure(op, BookingState::Confirmation)?;
        let time = self.required(op, "time", time)?;

        self.record.time = Some(time.to_string());
        self.set_state(BookingState::Confirmation);

        let instruction = format!(
            "Time saved: {time}. Now read ALL details back (name: {}, email: {}, time: {time}) \
             and ask 'Is this correct?'",
            self.record.name().unwrap_or_default(),
            self.record.email().unwrap_or_default(),
        );
        Ok(Directive::new(op, self.state(), instruction))
    }

    /// Confirms the booking and sends the notification, or falls back to
    /// scheduling when the user rejects the read-back.
    ///
    /// On confirmation the record reaches `Terminal` before the dispatch is
    /// awaited, so cancelling this future never un-commits the booking. A
    /// failed dispatch is reported in the directive, not as an error.
    pub async fn finalize(&mut self, confirmed: bool) -> Result<Directive, BookingError> {
        let op = Operation::Finalize;

        if !confirmed {
            self.ensure(op, BookingState::Scheduling)?;
            tracing::info!(
                session_id = %self.session_id,
                from = %self.state(),
                to = %BookingState::Scheduling,
                "fallback: user declined confirmation"
            );
            self.record.state = BookingState::Scheduling;
            return Ok(Directive::new(op, self.state(), DECLINED));
        }

        self.ensure(op, BookingState::Terminal)?;
        let email = self.collected(op, "email", self.record.email.clone())?;
        let name = self.collected(op, "name", self.record.name.clone())?;
        let time = self.collected(op, "time", self.record.time.clone())?;

        self.set_state(BookingState::Terminal);

        let status = self.dispatcher.send(&email, &name, &time).await;
        let instruction = match &status {
            DispatchStatus::Sent => CONFIRMED_SENT,
            DispatchStatus::Failed(reason) => {
                tracing::error!(
                    session_id = %self.session_id,
                    reason = %reason,
                    "confirmation email failed"
                );
                CONFIRMED_NOT_SENT
            }
        };
        Ok(Directive::new(op, self.state(), instruction).with_notification(status))
    }

    /// Routes a parsed tool call to its operation.
    pub async fn apply(&mut self, call: ToolCall) -> Result<Directive, BookingError> {
        match call {
            ToolCall::StartBooking => self.begin_booking(),
            ToolCall::SaveContactDetails { name, email } => self.record_contact(&name, &email),
            ToolCall::SaveTime { time } => self.record_time(&time),
            ToolCall::FinalizeBooking { confirmed } => self.finalize(confirmed).await,
        }
    }

    fn ensure(&self, op: Operation, next: BookingState) -> Result<(), BookingError> {
        let state = self.state();
        if state != op.required_state() || !state.can_transition_to(next) {
            tracing::warn!(
                session_id = %self.session_id,
                operation = %op,
                state = %state,
                "rejected out-of-order operation"
            );
            return Err(BookingError::InvalidTransition {
                operation: op,
                state,
            });
        }
        Ok(())
    }

    fn required<'a>(
        &self,
        op: Operation,
        field: &'static str,
        value: &'a str,
    ) -> Result<&'a str, BookingError> {
        let value = value.trim();
        if value.is_empty() {
            tracing::warn!(
                session_id = %self.session_id,
                operation = %op,
                field,
                "missing required field"
            );
            return Err(BookingError::MissingField { field });
        }
        Ok(value)
    }

    fn collected(
        &self,
        op: Operation,
        field: &'static str,
        value: Option<String>,
    ) -> Result<String, BookingError> {
        self.required(op, field, value.as_deref().unwrap_or_default())
            .map(str::to_string)
    }

    fn set_state(&mut self, next: BookingState) {
        tracing::info!(
            session_id = %self.session_id,
            from = %self.state(),
            to = %next,
            "transition"
        );
        self.record.state = next;
    }
}
