//! Counseling session aggregate.
//!
//! A session tracks a single counseling encounter from entry to exit.
//! Sessions are created open and become completed exactly once, either by an
//! explicit user action or by the auto-complete rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    CounselingSessionId, DomainError, ErrorCode, SessionStatus, Timestamp, ValidationError,
};

/// Maximum length for the session topic.
pub const MAX_TOPIC_LENGTH: usize = 500;

/// Who the counselor met with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantType {
    #[default]
    Student,
    Group,
    Parent,
}

impl ParticipantType {
    /// Persisted text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantType::Student => "student",
            ParticipantType::Group => "group",
            ParticipantType::Parent => "parent",
        }
    }
}

impl fmt::Display for ParticipantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParticipantType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(ParticipantType::Student),
            "group" => Ok(ParticipantType::Group),
            "parent" => Ok(ParticipantType::Parent),
            other => Err(ValidationError::invalid_format(
                "participant_type",
                format!("unknown participant type '{}'", other),
            )),
        }
    }
}

/// Counseling session aggregate.
///
/// # Invariants
///
/// - `id` is globally unique and immutable
/// - Status moves Open -> Completed at most once and never back
/// - `auto_completed` implies `status == Completed`
/// - `extension_granted` only changes while the session is open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounselingSession {
    id: CounselingSessionId,
    participant_type: ParticipantType,
    topic: String,

    /// Combined session date + entry time. `None` when the stored
    /// date/time could not be read.
    entry_at: Option<Timestamp>,
    exit_at: Option<Timestamp>,

    status: SessionStatus,
    auto_completed: bool,
    extension_granted: bool,

    created_at: Timestamp,
    updated_at: Timestamp,
}

impl CounselingSession {
    /// Create a new open session.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the topic is empty or too long
    pub fn new(
        id: CounselingSessionId,
        participant_type: ParticipantType,
        topic: String,
        entry_at: Timestamp,
    ) -> Result<Self, DomainError> {
        Self::validate_topic(&topic)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            participant_type,
            topic: topic.trim().to_string(),
            entry_at: Some(entry_at),
            exit_at: None,
            status: SessionStatus::Open,
            auto_completed: false,
            extension_granted: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: CounselingSessionId,
        participant_type: ParticipantType,
        topic: String,
        entry_at: Option<Timestamp>,
        exit_at: Option<Timestamp>,
        status: SessionStatus,
        auto_completed: bool,
        extension_granted: bool,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            participant_type,
            topic,
            entry_at,
            exit_at,
            status,
            // A stored auto flag on an open row is meaningless.
            auto_completed: auto_completed && !status.is_open(),
            extension_granted,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &CounselingSessionId {
        &self.id
    }

    pub fn participant_type(&self) -> ParticipantType {
        self.participant_type
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the instant the session began, if known.
    pub fn entry_at(&self) -> Option<&Timestamp> {
        self.entry_at.as_ref()
    }

    /// Returns the instant the session ended, if it has.
    pub fn exit_at(&self) -> Option<&Timestamp> {
        self.exit_at.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        !self.status.is_open()
    }

    /// True when completion came from the auto-complete rule.
    pub fn is_auto_completed(&self) -> bool {
        self.auto_completed
    }

    pub fn extension_granted(&self) -> bool {
        self.extension_granted
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Complete the session by explicit user action.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is already completed
    pub fn complete(&mut self, exit_at: Timestamp) -> Result<(), DomainError> {
        self.transition_to_completed(exit_at, false)
    }

    /// Complete the session on behalf of the auto-complete rule.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is already completed
    pub fn auto_complete(&mut self, exit_at: Timestamp) -> Result<(), DomainError> {
        self.transition_to_completed(exit_at, true)
    }

    /// Allow the session to stay open past the standard threshold.
    ///
    /// Returns `false` when the extension was already granted.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is already completed
    pub fn grant_extension(&mut self) -> Result<bool, DomainError> {
        self.ensure_open()?;
        if self.extension_granted {
            return Ok(false);
        }
        self.extension_granted = true;
        self.updated_at = Timestamp::now();
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn transition_to_completed(&mut self, exit_at: Timestamp, auto: bool) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&SessionStatus::Completed) {
            return Err(DomainError::new(
                ErrorCode::SessionCompleted,
                "Session is already completed",
            ));
        }

        self.status = SessionStatus::Completed;
        self.auto_completed = auto;
        self.exit_at = Some(exit_at);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status.is_open() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::SessionCompleted,
                "Cannot modify a completed session",
            ))
        }
    }

    fn validate_topic(topic: &str) -> Result<(), ValidationError> {
        let trimmed = topic.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("topic"));
        }
        let length = trimmed.chars().count();
        if length > MAX_TOPIC_LENGTH {
            return Err(ValidationError::too_long("topic", MAX_TOPIC_LENGTH, length));
        }
        Ok(())
    }
}
