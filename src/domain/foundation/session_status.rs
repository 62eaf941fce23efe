//! SessionStatus enum for tracking the lifecycle of counseling sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a counseling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Open,
    Completed,
}

impl SessionStatus {
    /// Returns true if the session can still be modified.
    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::Open)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Open -> Completed
    pub fn can_transition_to(&self, target: &SessionStatus) -> bool {
        use SessionStatus::*;
        matches!((self, target), (Open, Completed))
    }

    /// Maps the persisted `completed` flag to a status.
    pub fn from_completed_flag(completed: bool) -> Self {
        if completed {
            SessionStatus::Completed
        } else {
            SessionStatus::Open
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Open => "Open",
            SessionStatus::Completed => "Completed",
        };
        write!(f, "{}", s)
    }
}
