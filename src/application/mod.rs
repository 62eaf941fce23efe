//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) and query handlers (read) are kept separate.

pub mod handlers;

pub use handlers::{
    AutoCompleteSessionsHandler, AutoCompleteSessionsResult, CompleteSessionCommand,
    CompleteSessionHandler, CompleteSessionResult, CreateSessionCommand, CreateSessionHandler,
    CreateSessionResult, GetSessionHandler, GetSessionQuery, GrantExtensionCommand,
    GrantExtensionHandler, GrantExtensionResult,
};
