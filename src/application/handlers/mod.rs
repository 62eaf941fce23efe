//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod counseling;

pub use counseling::{
    AutoCompleteSessionsHandler, AutoCompleteSessionsResult, CompleteSessionCommand,
    CompleteSessionHandler, CompleteSessionResult, CreateSessionCommand, CreateSessionHandler,
    CreateSessionResult, GetSessionHandler, GetSessionQuery, GrantExtensionCommand,
    GrantExtensionHandler, GrantExtensionResult,
};
