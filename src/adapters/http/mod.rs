//! HTTP adapters - REST API implementations.

pub mod counseling;

pub use counseling::{counseling_router, CounselingAppState};
