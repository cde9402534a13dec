use serde::Serialize;

use crate::models::{BookingRecord, BookingState};

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub state: BookingState,
    pub name: Option<String>,
    pub email: Option<String>,
    pub time: Option<String>,
}

impl SessionSnapshot {
    pub fn new(session_id: &str, record: &BookingRecord) -> Self {
        Self {
            session_id: session_id.to_string(),
            state: record.state(),
            name: record.name().map(str::to_string),
            email: record.email().map(str::to_string),
            time: record.time().map(str::to_string),
        }
    }
}
