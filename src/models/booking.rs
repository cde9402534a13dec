use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    #[default]
    Discovery,
    CollectInfo,
    Scheduling,
    Confirmation,
    Terminal,
}

impl BookingState {
    pub const ALL: [BookingState; 5] = [
        BookingState::Discovery,
        BookingState::CollectInfo,
        BookingState::Scheduling,
        BookingState::Confirmation,
        BookingState::Terminal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::Discovery => "DISCOVERY",
            BookingState::CollectInfo => "COLLECT_INFO",
            BookingState::Scheduling => "SCHEDULING",
            BookingState::Confirmation => "CONFIRMATION",
            BookingState::Terminal => "TERMINAL",
        }
    }

    /// The complete edge table. Everything not listed here is illegal,
    /// including self-loops and any edge out of `Terminal`.
    pub fn can_transition_to(self, next: BookingState) -> bool {
        matches!(
            (self, next),
            (BookingState::Discovery, BookingState::CollectInfo)
                | (BookingState::CollectInfo, BookingState::Scheduling)
                | (BookingState::Scheduling, BookingState::Confirmation)
                | (BookingState::Confirmation, BookingState::Terminal)
                | (BookingState::Confirmation, BookingState::Scheduling)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == BookingState::Terminal
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data collected over one session. Only `BookingMachine` mutates it.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BookingRecord {
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) time: Option<String>,
    pub(crate) state: BookingState,
}

impl BookingRecord {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn state(&self) -> BookingState {
        self.state
    }
}
