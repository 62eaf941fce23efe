//! GetSessionHandler - Query handler for a single counseling session.

use std::sync::Arc;

use crate::domain::counseling::{CounselingSession, CounselingSessionError};
use crate::domain::foundation::CounselingSessionId;
use crate::ports::CounselingSessionStore;

/// Query to fetch a session by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: CounselingSessionId,
}

/// Handler for fetching sessions.
pub struct GetSessionHandler {
    store: Arc<dyn CounselingSessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn CounselingSessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: GetSessionQuery,
    ) -> Result<CounselingSession, CounselingSessionError> {
        self.store
            .find_by_id(&query.session_id)
            .await?
            .ok_or_else(|| CounselingSessionError::not_found(query.session_id))
    }
}
