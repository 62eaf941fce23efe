//! HTTP handlers for counseling session and auto-complete endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::adapters::scheduler::AutoCompleteScheduler;
use crate::application::handlers::{
    CompleteSessionCommand, CompleteSessionHandler, CreateSessionCommand, CreateSessionHandler,
    GetSessionHandler, GetSessionQuery, GrantExtensionCommand, GrantExtensionHandler,
};
use crate::domain::counseling::{CounselingSessionError, EntryClock, ParticipantType};
use crate::domain::foundation::CounselingSessionId;
use crate::ports::CounselingSessionStore;

use super::dto::{
    CreateSessionRequest, ErrorResponse, ExtensionResponse, SessionResponse, SweepResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state for counseling endpoints.
#[derive(Clone)]
pub struct CounselingAppState {
    pub store: Arc<dyn CounselingSessionStore>,
    pub clock: EntryClock,
    pub scheduler: Arc<AutoCompleteScheduler>,
}

impl CounselingAppState {
    pub fn new(
        store: Arc<dyn CounselingSessionStore>,
        clock: EntryClock,
        scheduler: Arc<AutoCompleteScheduler>,
    ) -> Self {
        Self {
            store,
            clock,
            scheduler,
        }
    }

    pub fn create_session_handler(&self) -> CreateSessionHandler {
        CreateSessionHandler::new(self.store.clone(), self.clock)
    }

    pub fn get_session_handler(&self) -> GetSessionHandler {
        GetSessionHandler::new(self.store.clone())
    }

    pub fn complete_session_handler(&self) -> CompleteSessionHandler {
        CompleteSessionHandler::new(self.store.clone())
    }

    pub fn grant_extension_handler(&self) -> GrantExtensionHandler {
        GrantExtensionHandler::new(self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/counseling-sessions - Open a new session
pub async fn create_session(
    State(state): State<CounselingAppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    let participant_type = match req.participant_type.as_deref() {
        None => ParticipantType::default(),
        Some(raw) => match raw.parse::<ParticipantType>() {
            Ok(participant_type) => participant_type,
            Err(e) => return handle_counseling_error(e.into()),
        },
    };

    let cmd = CreateSessionCommand {
        participant_type,
        topic: req.topic,
        session_date: req.session_date,
        entry_time: req.entry_time,
    };

    match state.create_session_handler().handle(cmd).await {
        Ok(result) => {
            let response = SessionResponse::from_session(&result.session, &state.clock);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_counseling_error(e),
    }
}

/// GET /api/counseling-sessions/:id - Get session details
pub async fn get_session(
    State(state): State<CounselingAppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .get_session_handler()
        .handle(GetSessionQuery { session_id })
        .await
    {
        Ok(session) => {
            let response = SessionResponse::from_session(&session, &state.clock);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_counseling_error(e),
    }
}

/// POST /api/counseling-sessions/:id/complete - Complete a session
pub async fn complete_session(
    State(state): State<CounselingAppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .complete_session_handler()
        .handle(CompleteSessionCommand { session_id })
        .await
    {
        Ok(result) => {
            let response = SessionResponse::from_session(&result.session, &state.clock);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_counseling_error(e),
    }
}

/// POST /api/counseling-sessions/:id/extension - Grant an extension
pub async fn grant_extension(
    State(state): State<CounselingAppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .grant_extension_handler()
        .handle(GrantExtensionCommand { session_id })
        .await
    {
        Ok(result) => {
            let response = ExtensionResponse {
                session: SessionResponse::from_session(&result.session, &state.clock),
                newly_granted: result.newly_granted,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_counseling_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scheduler handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/auto-complete/status - Scheduler status
pub async fn scheduler_status(State(state): State<CounselingAppState>) -> Response {
    (StatusCode::OK, Json(state.scheduler.status())).into_response()
}

/// POST /api/auto-complete/run - Run one sweep now
pub async fn run_sweep(State(state): State<CounselingAppState>) -> Response {
    match state.scheduler.sweep_once().await {
        Ok(result) => (StatusCode::OK, Json(SweepResponse::from(result))).into_response(),
        Err(e) => {
            error!(error = %e, "Manual auto-complete sweep failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Auto-complete sweep failed")),
            )
                .into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<CounselingSessionId, Response> {
    raw.parse::<CounselingSessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

fn handle_counseling_error(error: CounselingSessionError) -> Response {
    match error {
        CounselingSessionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Session", &id.to_string())),
        )
            .into_response(),
        CounselingSessionError::AlreadyCompleted(id) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(
                "SESSION_COMPLETED",
                format!("Session is already completed: {}", id),
            )),
        )
            .into_response(),
        CounselingSessionError::ValidationFailed { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation(&field, message)),
        )
            .into_response(),
        CounselingSessionError::Infrastructure(msg) => {
            error!(error = %msg, "Counseling session request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = handle_counseling_error(CounselingSessionError::NotFound(
            CounselingSessionId::new(),
        ));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn already_completed_maps_to_409() {
        let response = handle_counseling_error(CounselingSessionError::AlreadyCompleted(
            CounselingSessionId::new(),
        ));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_failed_maps_to_400() {
        let response = handle_counseling_error(CounselingSessionError::validation(
            "entry_time",
            "bad time",
        ));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let response =
            handle_counseling_error(CounselingSessionError::infrastructure("disk I/O error"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_id_is_bad_request() {
        let response = parse_session_id("not-a-uuid").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
