pub mod smtp;

use async_trait::async_trait;

use crate::models::DispatchStatus;

/// Sends the booking confirmation. Implementations make a single attempt and
/// report every failure through [`DispatchStatus::Failed`] instead of erroring.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, destination: &str, name: &str, time: &str) -> DispatchStatus;
}

/// Returns the name of the first empty argument, if any.
pub(crate) fn first_empty(destination: &str, name: &str, time: &str) -> Option<&'static str> {
    [("destination", destination), ("name", name), ("time", time)]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
}

#[cfg(test)]
pub(crate) mod testing;
