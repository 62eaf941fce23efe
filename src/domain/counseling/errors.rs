//! Counseling-session-specific error types.

use crate::domain::foundation::{CounselingSessionId, DomainError, ErrorCode, ValidationError};

/// Errors surfaced by counseling session commands and queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounselingSessionError {
    /// Session was not found.
    NotFound(CounselingSessionId),
    /// Session is already completed (possibly by a concurrent writer).
    AlreadyCompleted(CounselingSessionId),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl CounselingSessionError {
    pub fn not_found(id: CounselingSessionId) -> Self {
        CounselingSessionError::NotFound(id)
    }
    pub fn already_completed(id: CounselingSessionId) -> Self {
        CounselingSessionError::AlreadyCompleted(id)
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CounselingSessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        CounselingSessionError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            CounselingSessionError::NotFound(_) => ErrorCode::SessionNotFound,
            CounselingSessionError::AlreadyCompleted(_) => ErrorCode::SessionCompleted,
            CounselingSessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CounselingSessionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            CounselingSessionError::NotFound(id) => format!("Session not found: {}", id),
            CounselingSessionError::AlreadyCompleted(id) => {
                format!("Session is already completed: {}", id)
            }
            CounselingSessionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            CounselingSessionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for CounselingSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CounselingSessionError {}

impl From<ValidationError> for CounselingSessionError {
    fn from(err: ValidationError) -> Self {
        CounselingSessionError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for CounselingSessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => CounselingSessionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => CounselingSessionError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: CounselingSessionError = DomainError::validation("topic", "Topic cannot be empty").into();
        assert_eq!(
            err,
            CounselingSessionError::ValidationFailed {
                field: "topic".to_string(),
                message: "Topic cannot be empty".to_string(),
            }
        );
    }

    #[test]
    fn database_error_becomes_infrastructure() {
        let err: CounselingSessionError = DomainError::database("Failed to update session", "locked").into();
        assert!(matches!(err, CounselingSessionError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn already_completed_message_names_session() {
        let id = CounselingSessionId::new();
        let err = CounselingSessionError::already_completed(id);
        assert!(err.to_string().contains(&id.to_string()));
        assert_eq!(err.code(), ErrorCode::SessionCompleted);
    }
}
