use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::errors::AppError;
use crate::models::{Directive, SessionSnapshot, ToolCall};
use crate::services::booking::BookingMachine;
use crate::services::notification::NotificationDispatcher;

pub struct Session {
    pub machine: BookingMachine,
    last_activity: Instant,
}

impl Session {
    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// Live sessions keyed by session id. Each session's machine sits behind its
/// own async mutex so tool calls on one session are serialized while
/// different sessions proceed independently.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionHandle>>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(dispatcher: Arc<dyn NotificationDispatcher>, ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            dispatcher,
            ttl,
        }
    }

    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a session in `Discovery`. A fresh UUID is used when no id is given.
    pub fn create(&self, session_id: Option<String>) -> Result<String, AppError> {
        self.sweep_expired();

        let session_id = session_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut sessions = self.map();
        if sessions.contains_key(&session_id) {
            return Err(AppError::SessionExists(session_id));
        }
        let session = Session {
            machine: BookingMachine::new(session_id.clone(), Arc::clone(&self.dispatcher)),
            last_activity: Instant::now(),
        };
        sessions.insert(session_id.clone(), Arc::new(tokio::sync::Mutex::new(session)));

        tracing::info!(session_id = %session_id, "session started");
        Ok(session_id)
    }

    fn handle(&self, session_id: &str) -> Result<SessionHandle, AppError> {
        self.map()
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))
    }

    pub async fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot, AppError> {
        let handle = self.handle(session_id)?;
        let session = handle.lock().await;
        Ok(SessionSnapshot::new(session_id, session.machine.record()))
    }

    /// Runs a tool call against the session. A session that reaches
    /// `Terminal` is discarded afterwards.
    pub async fn invoke(&self, session_id: &str, call: ToolCall) -> Result<Directive, AppError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;
        session.touch();

        let directive = session.machine.apply(call).await?;

        if session.machine.state().is_terminal() {
            self.map().remove(session_id);
            tracing::info!(session_id = %session_id, "session completed");
        }
        Ok(directive)
    }

    /// Discards a session, e.g. when the transport drops. Returns whether it existed.
    pub fn end(&self, session_id: &str) -> bool {
        let removed = self.map().remove(session_id).is_some();
        if removed {
            tracing::info!(session_id = %session_id, "session ended");
        }
        removed
    }

    /// Drops sessions idle for at least the TTL. A session whose handle is
    /// held elsewhere has a call in flight and is never considered idle.
    pub fn sweep_expired(&self) -> usize {
        let mut sessions = self.map();
        let before = sessions.len();
        sessions.retain(|_, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            match handle.try_lock() {
                Ok(session) => session.last_activity.elapsed() < self.ttl,
                Err(_) => true,
            }
        });
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::info!(swept, "expired idle sessions");
        }
        swept
    }

    /// Sweeps expired sessions on a fixed interval. Never returns.
    pub async fn sweep_periodically(&self, every: Duration) {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.sweep_expired();
        }
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
