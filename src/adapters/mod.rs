//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - REST endpoints (axum)
//! - `memory` - In-memory store for tests and local development
//! - `scheduler` - Timer-driven background services
//! - `sqlite` - SQLite persistence (sqlx)

pub mod http;
pub mod memory;
pub mod scheduler;
pub mod sqlite;

pub use memory::InMemoryCounselingSessionStore;
pub use scheduler::{AutoCompleteScheduler, AutoCompleteSchedulerConfig, SchedulerStatus};
pub use sqlite::SqliteCounselingSessionStore;
