//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid host address")]
    InvalidHost,

    #[error("Invalid database URL format (expected sqlite:...)")]
    InvalidDatabaseUrl,

    #[error("Pool max_connections must be at least 1")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Scheduler interval must be at least one minute")]
    InvalidSchedulerInterval,

    #[error("Scheduler interval must be at most one day")]
    SchedulerIntervalTooLong,

    #[error("Standard auto-complete threshold must be positive")]
    InvalidThreshold,

    #[error("Extended auto-complete threshold is shorter than the standard threshold")]
    ExtendedThresholdTooShort,

    #[error("Auto-complete thresholds must be at most one week")]
    ThresholdTooLong,

    #[error("UTC offset must be between -720 and 840 minutes")]
    InvalidUtcOffset,
}
