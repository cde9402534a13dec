use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::Operation;

/// First thing the agent says once the user joins.
pub const GREETING: &str = "Greet the user.";

const INSTRUCTIONS: &str = r#"You are an Appointment Assistant following a strict state machine.
1. Wait for intent -> Call start_booking.
2. Ask Name/Email -> Call save_contact_details.
    - The email and name MUST be spelt out clearly for better accuracy.
    - Confirm the details back to the user before proceeding.
3. Ask Time -> Call save_time.
    - If the user says tomorrow, next Monday, etc., convert to exact date/time.
    - CURRENT DATE/TIME: {now} (Use this to calculate relative dates like 'next Tuesday, tomorrow').
    - Confirm the time back to the user before proceeding.
4. Confirm -> Call finalize_booking.
If user says NO at step 4, go back to step 3.
"#;

/// Instructions for the language model, anchored to the current local time so
/// it can resolve relative dates.
pub fn agent_instructions(now: NaiveDateTime) -> String {
    let now = now.format("%A, %B %d, %Y at %I:%M %p").to_string();
    INSTRUCTIONS.replace("{now}", &now)
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

pub fn tool_definition(op: Operation) -> ToolDefinition {
    let (description, parameters) = match op {
        Operation::BeginBooking => (
            "User wants to book. Move to Data Collection.",
            json!({ "type": "object", "properties": {}, "required": [] }),
        ),
        Operation::RecordContact => (
            "Save Name and Email. Move to Scheduling.",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Full name, as spelt by the user" },
                    "email": { "type": "string", "description": "Email address, as spelt by the user" }
                },
                "required": ["name", "email"]
            }),
        ),
        Operation::RecordTime => (
            "Save Time. Move to Confirmation.",
            json!({
                "type": "object",
                "properties": {
                    "time": { "type": "string", "description": "Exact appointment date and time" }
                },
                "required": ["time"]
            }),
        ),
        Operation::Finalize => (
            "Handle confirmation. If true: sends the confirmation email and ends. \
             If false: goes back to asking for the date and time.",
            json!({
                "type": "object",
                "properties": {
                    "confirmed": { "type": "boolean", "description": "Whether the user accepted the read-back" }
                },
                "required": ["confirmed"]
            }),
        ),
    };

    ToolDefinition {
        name: op.tool_name(),
        description,
        parameters,
    }
}

pub fn tool_catalogue() -> Vec<ToolDefinition> {
    Operation::ALL.into_iter().map(tool_definition).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_instructions_include_current_time() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 16)
            .unwrap()
            .and_hms_opt(15, 5, 0)
            .unwrap();
        let text = agent_instructions(now);
        assert!(text.contains("CURRENT DATE/TIME: Monday, June 16, 2025 at 03:05 PM"));
        assert!(!text.contains("{now}"));
    }

    #[test]
    fn test_catalogue_matches_operations() {
        let names: Vec<_> = tool_catalogue().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["start_booking", "save_contact_details", "save_time", "finalize_booking"]
        );
    }

    #[test]
    fn test_required_parameters() {
        let def = tool_definition(Operation::RecordContact);
        assert_eq!(def.parameters["required"], json!(["name", "email"]));
        let def = tool_definition(Operation::Finalize);
        assert_eq!(def.parameters["properties"]["confirmed"]["type"], "boolean");
    }
}
