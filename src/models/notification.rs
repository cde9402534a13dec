use serde::Serialize;

/// Outcome of a single confirmation dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchStatus {
    Sent,
    /// Carries an operator-facing diagnostic. Never relayed to the end user.
    Failed(String),
}

impl DispatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStatus::Sent => "sent",
            DispatchStatus::Failed(_) => "failed",
        }
    }
}

// Serialized without the failure reason so it can be returned to callers as-is.
impl Serialize for DispatchStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Subject and plain-text body of the confirmation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationMessage {
    pub subject: String,
    pub body: String,
}

impl ConfirmationMessage {
    pub fn new(name: &str, time: &str) -> Self {
        Self {
            subject: "Appointment Confirmation".to_string(),
            body: format!(
                "Hello {name},\n\nYour appointment is confirmed for: {time}.\n\nThank you!"
            ),
        }
    }
}
