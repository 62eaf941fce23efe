//! SQLite adapters - Database implementations for store ports.
//!
//! - `SqliteCounselingSessionStore` - Counseling session persistence

mod counseling_session_store;

pub use counseling_session_store::SqliteCounselingSessionStore;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Open a connection pool for the configured database.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DomainError::database("Invalid database URL", e))?
        .create_if_missing(config.create_if_missing);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_with(options)
        .await
        .map_err(|e| DomainError::database("Failed to connect to database", e))
}

/// Single-connection pool over a private in-memory database.
///
/// Every SQLite in-memory connection is its own database, so the pool is
/// pinned to one connection that never idles out.
pub async fn memory_pool() -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| DomainError::database("Invalid database URL", e))?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| DomainError::database("Failed to open in-memory database", e))
}
