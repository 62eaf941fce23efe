//! Counseling session command and query handlers.

mod auto_complete_sessions;
mod complete_session;
mod create_session;
mod get_session;
mod grant_extension;

pub use auto_complete_sessions::{AutoCompleteSessionsHandler, AutoCompleteSessionsResult};
pub use complete_session::{CompleteSessionCommand, CompleteSessionHandler, CompleteSessionResult};
pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use grant_extension::{GrantExtensionCommand, GrantExtensionHandler, GrantExtensionResult};
