//! Route configuration for counseling endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    complete_session, create_session, get_session, grant_extension, run_sweep, scheduler_status,
    CounselingAppState,
};

/// Creates the counseling router with all endpoints.
///
/// Routes:
/// - `POST /api/counseling-sessions` - Open a session
/// - `GET /api/counseling-sessions/:id` - Get a session
/// - `POST /api/counseling-sessions/:id/complete` - Complete a session
/// - `POST /api/counseling-sessions/:id/extension` - Grant an extension
/// - `GET /api/auto-complete/status` - Scheduler status
/// - `POST /api/auto-complete/run` - Run one sweep now
pub fn counseling_router() -> Router<CounselingAppState> {
    Router::new()
        .route("/api/counseling-sessions", post(create_session))
        .route("/api/counseling-sessions/:id", get(get_session))
        .route("/api/counseling-sessions/:id/complete", post(complete_session))
        .route("/api/counseling-sessions/:id/extension", post(grant_extension))
        .route("/api/auto-complete/status", get(scheduler_status))
        .route("/api/auto-complete/run", post(run_sweep))
}
