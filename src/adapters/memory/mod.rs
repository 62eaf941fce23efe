//! In-memory adapters for tests and local development.

mod counseling_session_store;

pub use counseling_session_store::InMemoryCounselingSessionStore;
