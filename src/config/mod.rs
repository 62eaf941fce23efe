//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `COUNSELING_DESK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use counseling_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Sweeping every {:?}", config.scheduler.interval());
//! ```

mod database;
mod error;
mod scheduler;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use scheduler::SchedulerConfig;
pub use server::ServerConfig;

use serde::Deserialize;

use crate::domain::counseling::{AutoCompletePolicy, EntryClock};

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, log filter)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (SQLite connection)
    pub database: DatabaseConfig,

    /// Auto-complete scheduler and policy
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `COUNSELING_DESK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `COUNSELING_DESK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `COUNSELING_DESK__DATABASE__URL=...` -> `database.url = ...`
    /// - `COUNSELING_DESK__SCHEDULER__INTERVAL_MINUTES=2` -> `scheduler.interval_minutes = 2`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COUNSELING_DESK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }

    /// Auto-complete policy built from the scheduler thresholds
    pub fn policy(&self) -> Result<AutoCompletePolicy, ValidationError> {
        AutoCompletePolicy::from_minutes(
            self.scheduler.standard_threshold_minutes,
            self.scheduler.extended_threshold_minutes,
        )
        .map_err(|_| ValidationError::InvalidThreshold)
    }

    /// Clock used to read stored session date/time
    pub fn clock(&self) -> Result<EntryClock, ValidationError> {
        EntryClock::from_offset_minutes(self.scheduler.utc_offset_minutes)
            .map_err(|_| ValidationError::InvalidUtcOffset)
    }
}
