use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ToolCallError;
use crate::models::BookingState;

/// One caller-visible transition of the booking machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    BeginBooking,
    RecordContact,
    RecordTime,
    Finalize,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::BeginBooking,
        Operation::RecordContact,
        Operation::RecordTime,
        Operation::Finalize,
    ];

    pub fn required_state(&self) -> BookingState {
        match self {
            Operation::BeginBooking => BookingState::Discovery,
            Operation::RecordContact => BookingState::CollectInfo,
            Operation::RecordTime => BookingState::Scheduling,
            Operation::Finalize => BookingState::Confirmation,
        }
    }

    /// Name under which the operation is exposed to the language model.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Operation::BeginBooking => "start_booking",
            Operation::RecordContact => "save_contact_details",
            Operation::RecordTime => "save_time",
            Operation::Finalize => "finalize_booking",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Operation::ALL.into_iter().find(|op| op.tool_name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// A tool invocation with its already-extracted arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    StartBooking,
    SaveContactDetails { name: String, email: String },
    SaveTime { time: String },
    FinalizeBooking { confirmed: bool },
}

// Missing text arguments default to empty so the machine reports them as
// missing fields instead of the request failing to parse.
#[derive(Deserialize)]
struct ContactArgs {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct TimeArgs {
    #[serde(default)]
    time: String,
}

#[derive(Deserialize)]
struct FinalizeArgs {
    confirmed: bool,
}

impl ToolCall {
    pub fn operation(&self) -> Operation {
        match self {
            ToolCall::StartBooking => Operation::BeginBooking,
            ToolCall::SaveContactDetails { .. } => Operation::RecordContact,
            ToolCall::SaveTime { .. } => Operation::RecordTime,
            ToolCall::FinalizeBooking { .. } => Operation::Finalize,
        }
    }

    /// Builds a call from a tool name and its JSON arguments. A `null`
    /// argument payload is treated as an empty object.
    pub fn parse(tool: &str, arguments: Value) -> Result<Self, ToolCallError> {
        let operation = Operation::from_tool_name(tool)
            .ok_or_else(|| ToolCallError::UnknownTool(tool.to_string()))?;

        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let invalid = |source| ToolCallError::InvalidArguments {
            tool: tool.to_string(),
            source,
        };

        match operation {
            Operation::BeginBooking => Ok(ToolCall::StartBooking),
            Operation::RecordContact => {
                let args: ContactArgs = serde_json::from_value(arguments).map_err(invalid)?;
                Ok(ToolCall::SaveContactDetails {
                    name: args.name,
                    email: args.email,
                })
            }
            Operation::RecordTime => {
                let args: TimeArgs = serde_json::from_value(arguments).map_err(invalid)?;
                Ok(ToolCall::SaveTime { time: args.time })
            }
            Operation::Finalize => {
                let args: FinalizeArgs = serde_json::from_value(arguments).map_err(invalid)?;
                Ok(ToolCall::FinalizeBooking {
                    confirmed: args.confirmed,
                })
            }
        }
    }
}
