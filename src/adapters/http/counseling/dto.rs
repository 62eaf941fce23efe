//! HTTP DTOs for counseling session and auto-complete endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::AutoCompleteSessionsResult;
use crate::domain::counseling::{CounselingSession, EntryClock};
use crate::domain::foundation::SessionStatus;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to open a new session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub topic: String,
    /// `student`, `group` or `parent`; defaults to `student`.
    #[serde(default)]
    pub participant_type: Option<String>,
    /// School-local date, `YYYY-MM-DD`.
    pub session_date: String,
    /// School-local time, `HH:MM` or `HH:MM:SS`.
    pub entry_time: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Session view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub participant_type: String,
    pub topic: String,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<String>,
    pub completed: bool,
    pub auto_completed: bool,
    pub extension_granted: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl SessionResponse {
    /// Renders the session with date/time in school-local form.
    pub fn from_session(session: &CounselingSession, clock: &EntryClock) -> Self {
        let (session_date, entry_time) = match session.entry_at() {
            Some(entry_at) => {
                let (date, time) = clock.split(entry_at);
                (Some(date), Some(time))
            }
            None => (None, None),
        };

        Self {
            id: session.id().to_string(),
            participant_type: session.participant_type().to_string(),
            topic: session.topic().to_string(),
            status: session.status(),
            session_date,
            entry_time,
            exit_time: session.exit_at().map(|t| t.to_rfc3339()),
            completed: session.is_completed(),
            auto_completed: session.is_auto_completed(),
            extension_granted: session.extension_granted(),
            created_at: session.created_at().to_rfc3339(),
            updated_at: session.updated_at().to_rfc3339(),
        }
    }
}

/// Response for the extension endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionResponse {
    pub session: SessionResponse,
    pub newly_granted: bool,
}

/// Response for a manually triggered sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub examined: usize,
    pub completed: usize,
    pub skipped_malformed: usize,
}

impl From<AutoCompleteSessionsResult> for SweepResponse {
    fn from(result: AutoCompleteSessionsResult) -> Self {
        Self {
            examined: result.examined,
            completed: result.completed,
            skipped_malformed: result.skipped_malformed,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: message.into(),
            details: Some(serde_json::json!({ "field": field })),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn conflict(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
