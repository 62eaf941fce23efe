//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a counseling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounselingSessionId(Uuid);

impl CounselingSessionId {
    /// Creates a new random CounselingSessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CounselingSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CounselingSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CounselingSessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
