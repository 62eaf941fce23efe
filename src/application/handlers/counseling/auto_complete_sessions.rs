//! AutoCompleteSessionsHandler - One sweep of the auto-complete rule.
//!
//! Fetches open candidates, evaluates the rule for each against a single
//! `now`, and completes the ones that are due through the store's
//! conditional write. Only writes that affected a row are counted.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::counseling::{AutoCompleteDecision, AutoCompletePolicy};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{Completion, CounselingSessionStore};

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoCompleteSessionsResult {
    /// Candidates returned by the store.
    pub examined: usize,
    /// Sessions this sweep completed.
    pub completed: usize,
    /// Open sessions skipped because their entry time could not be read.
    pub skipped_malformed: usize,
}

/// Handler for running the auto-complete sweep.
pub struct AutoCompleteSessionsHandler {
    store: Arc<dyn CounselingSessionStore>,
    policy: AutoCompletePolicy,
}

impl AutoCompleteSessionsHandler {
    pub fn new(store: Arc<dyn CounselingSessionStore>, policy: AutoCompletePolicy) -> Self {
        Self { store, policy }
    }

    /// Runs one sweep at `now`.
    ///
    /// # Errors
    ///
    /// Any store error aborts the sweep and is returned as is. Sessions
    /// completed before the failure stay completed.
    pub async fn handle(&self, now: Timestamp) -> Result<AutoCompleteSessionsResult, DomainError> {
        let cutoff = self.policy.candidate_cutoff(&now);
        let candidates = self.store.list_open_sessions_older_than(&cutoff).await?;

        let mut result = AutoCompleteSessionsResult {
            examined: candidates.len(),
            ..Default::default()
        };

        for session in &candidates {
            match self.policy.evaluate(session, &now) {
                AutoCompleteDecision::Due { overdue } => {
                    let affected = self
                        .store
                        .mark_completed(session.id(), Completion::automatic(now))
                        .await?;

                    if affected > 0 {
                        result.completed += 1;
                        debug!(
                            session_id = %session.id(),
                            overdue_minutes = overdue.num_minutes(),
                            "Auto-completed counseling session"
                        );
                    } else {
                        debug!(
                            session_id = %session.id(),
                            "Session completed elsewhere before auto-completion"
                        );
                    }
                }
                AutoCompleteDecision::MissingEntryTime => {
                    result.skipped_malformed += 1;
                    warn!(
                        session_id = %session.id(),
                        "Open session has no readable entry time, skipping"
                    );
                }
                AutoCompleteDecision::NotDue { .. } | AutoCompleteDecision::AlreadyCompleted => {}
            }
        }

        if result.completed > 0 {
            info!(
                completed = result.completed,
                examined = result.examined,
                "Auto-complete sweep finished"
            );
        }

        Ok(result)
    }
}
