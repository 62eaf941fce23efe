//! Counseling session store port.
//!
//! Defines the persistence contract the counseling module and the
//! auto-complete sweep rely on.
//!
//! # Conditional writes
//!
//! Every state-changing operation is scoped to `completed = false` at write
//! time and reports the number of rows it affected. When a user completes a
//! session at the same moment the sweep does, exactly one write affects a
//! row; the other affects zero and must not be counted.

use async_trait::async_trait;

use crate::domain::counseling::CounselingSession;
use crate::domain::foundation::{CounselingSessionId, DomainError, Timestamp};

/// How a session is being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// True when the auto-complete rule, not a user, is completing the session.
    pub auto_completed: bool,
    /// Instant recorded as the session's exit.
    pub exit_at: Timestamp,
}

impl Completion {
    /// Completion decided by the auto-complete rule.
    pub fn automatic(exit_at: Timestamp) -> Self {
        Self {
            auto_completed: true,
            exit_at,
        }
    }

    /// Completion requested by a user.
    pub fn manual(exit_at: Timestamp) -> Self {
        Self {
            auto_completed: false,
            exit_at,
        }
    }
}

/// Store port for counseling sessions.
#[async_trait]
pub trait CounselingSessionStore: Send + Sync {
    /// Insert a new session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &CounselingSession) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(
        &self,
        id: &CounselingSessionId,
    ) -> Result<Option<CounselingSession>, DomainError>;

    /// All open sessions whose entry precedes `cutoff`.
    ///
    /// Open sessions whose entry instant is unknown are included so callers
    /// can report them; they are never due.
    async fn list_open_sessions_older_than(
        &self,
        cutoff: &Timestamp,
    ) -> Result<Vec<CounselingSession>, DomainError>;

    /// Mark a session completed if it is still open.
    ///
    /// Returns the number of rows affected: 1 when this call completed the
    /// session, 0 when it was already completed or does not exist.
    async fn mark_completed(
        &self,
        id: &CounselingSessionId,
        completion: Completion,
    ) -> Result<u64, DomainError>;

    /// Grant an extension if the session is still open.
    ///
    /// Returns the number of rows affected.
    async fn grant_extension(&self, id: &CounselingSessionId) -> Result<u64, DomainError>;
}
