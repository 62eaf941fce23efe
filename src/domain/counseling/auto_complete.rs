//! Auto-complete rule for open counseling sessions.
//!
//! A session that has stayed open longer than its threshold is considered
//! finished and may be completed by the system. The threshold is the standard
//! one, or the extended one when the session was granted an extension.
//!
//! Evaluation is pure: the same session and instant always give the same
//! decision, and a completed session is never due.

use chrono::Duration;

use crate::domain::foundation::{DomainError, Timestamp};

use super::CounselingSession;

/// Threshold policy for automatic completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoCompletePolicy {
    standard_threshold: Duration,
    extended_threshold: Duration,
}

/// Outcome of evaluating a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoCompleteDecision {
    /// Already completed; nothing to do.
    AlreadyCompleted,
    /// Entry instant unknown; never completed on bad data.
    MissingEntryTime,
    /// Still within its threshold.
    NotDue { remaining: Duration },
    /// Elapsed time exceeds the applicable threshold.
    Due { overdue: Duration },
}

impl AutoCompleteDecision {
    pub fn is_due(&self) -> bool {
        matches!(self, AutoCompleteDecision::Due { .. })
    }
}

impl AutoCompletePolicy {
    /// Creates a policy from the two thresholds.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a threshold is not positive or the extended
    ///   threshold is shorter than the standard one
    pub fn new(standard_threshold: Duration, extended_threshold: Duration) -> Result<Self, DomainError> {
        if standard_threshold <= Duration::zero() {
            return Err(DomainError::validation(
                "standard_threshold",
                "Standard threshold must be positive",
            ));
        }
        if extended_threshold < standard_threshold {
            return Err(DomainError::validation(
                "extended_threshold",
                "Extended threshold cannot be shorter than the standard threshold",
            ));
        }
        Ok(Self {
            standard_threshold,
            extended_threshold,
        })
    }

    /// Convenience constructor from whole minutes.
    ///
    /// # Errors
    ///
    /// See [`AutoCompletePolicy::new`].
    pub fn from_minutes(standard: i64, extended: i64) -> Result<Self, DomainError> {
        let standard = Duration::try_minutes(standard).ok_or_else(|| {
            DomainError::validation("standard_threshold", "Standard threshold is out of range")
        })?;
        let extended = Duration::try_minutes(extended).ok_or_else(|| {
            DomainError::validation("extended_threshold", "Extended threshold is out of range")
        })?;
        Self::new(standard, extended)
    }

    pub fn standard_threshold(&self) -> Duration {
        self.standard_threshold
    }

    pub fn extended_threshold(&self) -> Duration {
        self.extended_threshold
    }

    /// Threshold that applies to the given session.
    pub fn threshold_for(&self, session: &CounselingSession) -> Duration {
        if session.extension_granted() {
            self.extended_threshold
        } else {
            self.standard_threshold
        }
    }

    /// Sessions that entered at or after this instant cannot be due yet.
    pub fn candidate_cutoff(&self, now: &Timestamp) -> Timestamp {
        now.minus(self.standard_threshold)
    }

    /// Evaluates the rule for one session at `now`.
    pub fn evaluate(&self, session: &CounselingSession, now: &Timestamp) -> AutoCompleteDecision {
        if session.is_completed() {
            return AutoCompleteDecision::AlreadyCompleted;
        }

        let Some(entry_at) = session.entry_at() else {
            return AutoCompleteDecision::MissingEntryTime;
        };

        let elapsed = now.duration_since(entry_at);
        let threshold = self.threshold_for(session);

        if elapsed > threshold {
            AutoCompleteDecision::Due {
                overdue: elapsed - threshold,
            }
        } else {
            AutoCompleteDecision::NotDue {
                remaining: threshold - elapsed,
            }
        }
    }

    /// True when the session should be completed automatically at `now`.
    pub fn should_auto_complete(&self, session: &CounselingSession, now: &Timestamp) -> bool {
        self.evaluate(session, now).is_due()
    }
}
