//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CounselingSessionStore` - Persistence for counseling sessions,
//!   including the conditional completion write used by auto-complete

mod counseling_session_store;

pub use counseling_session_store::{Completion, CounselingSessionStore};
