//! CompleteSessionHandler - Command handler for explicit session completion.
//!
//! The store write is conditional on the session still being open. When the
//! auto-complete sweep gets there first the write affects no row and the
//! command fails with `AlreadyCompleted`.

use std::sync::Arc;

use tracing::debug;

use crate::domain::counseling::{CounselingSession, CounselingSessionError};
use crate::domain::foundation::{CounselingSessionId, Timestamp};
use crate::ports::{Completion, CounselingSessionStore};

/// Command to complete a session on behalf of a user.
#[derive(Debug, Clone)]
pub struct CompleteSessionCommand {
    pub session_id: CounselingSessionId,
}

/// Result of successful completion.
#[derive(Debug, Clone)]
pub struct CompleteSessionResult {
    pub session: CounselingSession,
}

/// Handler for completing sessions.
pub struct CompleteSessionHandler {
    store: Arc<dyn CounselingSessionStore>,
}

impl CompleteSessionHandler {
    pub fn new(store: Arc<dyn CounselingSessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CompleteSessionCommand,
    ) -> Result<CompleteSessionResult, CounselingSessionError> {
        // 1. Load session
        let mut session = self
            .store
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| CounselingSessionError::not_found(cmd.session_id))?;

        if session.is_completed() {
            return Err(CounselingSessionError::already_completed(cmd.session_id));
        }

        // 2. Conditional write
        let exit_at = Timestamp::now();
        let affected = self
            .store
            .mark_completed(&cmd.session_id, Completion::manual(exit_at))
            .await?;

        if affected == 0 {
            debug!(session_id = %cmd.session_id, "Session completed concurrently");
            return Err(CounselingSessionError::already_completed(cmd.session_id));
        }

        // 3. Mirror the write on the loaded aggregate
        session
            .complete(exit_at)
            .map_err(|_| CounselingSessionError::already_completed(cmd.session_id))?;

        Ok(CompleteSessionResult { session })
    }
}
