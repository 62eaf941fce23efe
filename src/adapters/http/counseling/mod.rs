//! HTTP adapter for counseling endpoints.
//!
//! Exposes counseling sessions and the auto-complete scheduler via REST API:
//! - `POST /api/counseling-sessions` - Open a session
//! - `GET /api/counseling-sessions/:id` - Get a session
//! - `POST /api/counseling-sessions/:id/complete` - Complete a session
//! - `POST /api/counseling-sessions/:id/extension` - Grant an extension
//! - `GET /api/auto-complete/status` - Scheduler status
//! - `POST /api/auto-complete/run` - Run one sweep now

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateSessionRequest, ErrorResponse, ExtensionResponse, SessionResponse, SweepResponse,
};
pub use handlers::CounselingAppState;
pub use routes::counseling_router;
