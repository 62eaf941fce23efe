//! In-Memory Counseling Session Store
//!
//! Keeps sessions in a map behind an async lock.
//! Useful for testing and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::counseling::CounselingSession;
use crate::domain::foundation::{CounselingSessionId, DomainError, Timestamp};
use crate::ports::{Completion, CounselingSessionStore};

/// In-memory storage for counseling sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCounselingSessionStore {
    sessions: Arc<RwLock<HashMap<CounselingSessionId, CounselingSession>>>,
}

impl InMemoryCounselingSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl CounselingSessionStore for InMemoryCounselingSessionStore {
    async fn save(&self, session: &CounselingSession) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CounselingSessionId,
    ) -> Result<Option<CounselingSession>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn list_open_sessions_older_than(
        &self,
        cutoff: &Timestamp,
    ) -> Result<Vec<CounselingSession>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut open: Vec<CounselingSession> = sessions
            .values()
            .filter(|s| !s.is_completed())
            .filter(|s| s.entry_at().map_or(true, |entry| entry.is_before(cutoff)))
            .cloned()
            .collect();
        open.sort_by_key(|s| s.entry_at().copied());
        Ok(open)
    }

    async fn mark_completed(
        &self,
        id: &CounselingSessionId,
        completion: Completion,
    ) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(id) else {
            return Ok(0);
        };
        if session.is_completed() {
            return Ok(0);
        }

        if completion.auto_completed {
            session.auto_complete(completion.exit_at)?;
        } else {
            session.complete(completion.exit_at)?;
        }
        Ok(1)
    }

    async fn grant_extension(&self, id: &CounselingSessionId) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(session) if !session.is_completed() => {
                session.grant_extension()?;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}
