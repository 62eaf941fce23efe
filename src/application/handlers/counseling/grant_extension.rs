//! GrantExtensionHandler - Command handler for extending an open session.

use std::sync::Arc;

use tracing::debug;

use crate::domain::counseling::{CounselingSession, CounselingSessionError};
use crate::domain::foundation::CounselingSessionId;
use crate::ports::CounselingSessionStore;

/// Command to let a session run to the extended threshold.
#[derive(Debug, Clone)]
pub struct GrantExtensionCommand {
    pub session_id: CounselingSessionId,
}

/// Result of a successful extension request.
#[derive(Debug, Clone)]
pub struct GrantExtensionResult {
    pub session: CounselingSession,
    /// False when the extension had already been granted.
    pub newly_granted: bool,
}

/// Handler for granting extensions.
pub struct GrantExtensionHandler {
    store: Arc<dyn CounselingSessionStore>,
}

impl GrantExtensionHandler {
    pub fn new(store: Arc<dyn CounselingSessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: GrantExtensionCommand,
    ) -> Result<GrantExtensionResult, CounselingSessionError> {
        let mut session = self
            .store
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| CounselingSessionError::not_found(cmd.session_id))?;

        let newly_granted = session
            .grant_extension()
            .map_err(|_| CounselingSessionError::already_completed(cmd.session_id))?;

        if newly_granted {
            let affected = self.store.grant_extension(&cmd.session_id).await?;
            if affected == 0 {
                return Err(CounselingSessionError::already_completed(cmd.session_id));
            }
            debug!(session_id = %cmd.session_id, "Extension granted");
        }

        Ok(GrantExtensionResult {
            session,
            newly_granted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCounselingSessionStore;
    use crate::domain::counseling::ParticipantType;
    use crate::domain::foundation::Timestamp;
    use crate::ports::Completion;

    async fn stored_session(store: &InMemoryCounselingSessionStore) -> CounselingSession {
        let session = CounselingSession::new(
            CounselingSessionId::new(),
            ParticipantType::Group,
            "Conflict resolution".to_string(),
            Timestamp::now(),
        )
        .unwrap();
        store.save(&session).await.unwrap();
        session
    }

    #[tokio::test]
    async fn grants_extension_once() {
        let store = Arc::new(InMemoryCounselingSessionStore::new());
        let session = stored_session(&store).await;
        let handler = GrantExtensionHandler::new(store.clone());
        let cmd = GrantExtensionCommand {
            session_id: *session.id(),
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        assert!(first.newly_granted);
        assert!(first.session.extension_granted());

        let second = handler.handle(cmd).await.unwrap();
        assert!(!second.newly_granted);
        assert!(second.session.extension_granted());

        let stored = store.find_by_id(session.id()).await.unwrap().unwrap();
        assert!(stored.extension_granted());
    }

    #[tokio::test]
    async fn completed_session_cannot_be_extended() {
        let store = Arc::new(InMemoryCounselingSessionStore::new());
        let session = stored_session(&store).await;
        store
            .mark_completed(session.id(), Completion::automatic(Timestamp::now()))
            .await
            .unwrap();

        let handler = GrantExtensionHandler::new(store);
        let result = handler
            .handle(GrantExtensionCommand {
                session_id: *session.id(),
            })
            .await;

        assert_eq!(
            result.unwrap_err(),
            CounselingSessionError::AlreadyCompleted(*session.id())
        );
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let handler = GrantExtensionHandler::new(Arc::new(InMemoryCounselingSessionStore::new()));
        let id = CounselingSessionId::new();

        let result = handler.handle(GrantExtensionCommand { session_id: id }).await;

        assert_eq!(result.unwrap_err(), CounselingSessionError::NotFound(id));
    }
}
