//! Dispatcher fakes that record calls instead of sending mail.

use std::sync::Mutex;

use async_trait::async_trait;

use super::NotificationDispatcher;
use crate::models::DispatchStatus;

/// Records every `(destination, name, time)` and answers with a fixed status.
pub struct RecordingDispatcher {
    status: DispatchStatus,
    pub calls: Mutex<Vec<(String, String, String)>>,
}

impl Default for RecordingDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::with_status(DispatchStatus::Sent)
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_status(DispatchStatus::Failed(reason.to_string()))
    }

    pub fn with_status(status: DispatchStatus) -> Self {
        Self {
            status,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, destination: &str, name: &str, time: &str) -> DispatchStatus {
        self.calls.lock().unwrap().push((
            destination.to_string(),
            name.to_string(),
            time.to_string(),
        ));
        self.status.clone()
    }
}

/// Never completes. Used to cancel a dispatch mid-flight.
pub struct StalledDispatcher;

#[async_trait]
impl NotificationDispatcher for StalledDispatcher {
    async fn send(&self, _destination: &str, _name: &str, _time: &str) -> DispatchStatus {
        std::future::pending().await
    }
}
