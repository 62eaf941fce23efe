//! CreateSessionHandler - Command handler for opening counseling sessions.

use std::sync::Arc;

use tracing::debug;

use crate::domain::counseling::{
    CounselingSession, CounselingSessionError, EntryClock, ParticipantType,
};
use crate::domain::foundation::CounselingSessionId;
use crate::ports::CounselingSessionStore;

/// Command to open a new counseling session.
///
/// `session_date` and `entry_time` are school-local wall-clock text
/// (`YYYY-MM-DD`, `HH:MM[:SS]`).
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub participant_type: ParticipantType,
    pub topic: String,
    pub session_date: String,
    pub entry_time: String,
}

/// Result of successful session creation.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub session: CounselingSession,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    store: Arc<dyn CounselingSessionStore>,
    clock: EntryClock,
}

impl CreateSessionHandler {
    pub fn new(store: Arc<dyn CounselingSessionStore>, clock: EntryClock) -> Self {
        Self { store, clock }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
    ) -> Result<CreateSessionResult, CounselingSessionError> {
        let entry_at = self.clock.combine(&cmd.session_date, &cmd.entry_time)?;

        let session = CounselingSession::new(
            CounselingSessionId::new(),
            cmd.participant_type,
            cmd.topic,
            entry_at,
        )?;

        self.store.save(&session).await?;

        debug!(
            session_id = %session.id(),
            participant_type = %session.participant_type(),
            "Counseling session opened"
        );

        Ok(CreateSessionResult { session })
    }
}
