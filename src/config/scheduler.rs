//! Auto-complete scheduler configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::counseling::{MAX_UTC_OFFSET_MINUTES, MIN_UTC_OFFSET_MINUTES};

/// Longest accepted sweep interval (one day)
pub const MAX_INTERVAL_MINUTES: u64 = 24 * 60;

/// Longest accepted auto-complete threshold (one week)
pub const MAX_THRESHOLD_MINUTES: i64 = 7 * 24 * 60;

/// Auto-complete scheduler and threshold policy configuration
///
/// The threshold defaults are placeholders; each deployment is expected to
/// set the values its school uses.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Start the scheduler when the server starts
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Minutes between sweeps
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Minutes an open session may run before it is auto-completed
    #[serde(default = "default_standard_threshold")]
    pub standard_threshold_minutes: i64,

    /// Minutes an open session with an extension may run
    #[serde(default = "default_extended_threshold")]
    pub extended_threshold_minutes: i64,

    /// School-local offset from UTC used to read session date/time
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl SchedulerConfig {
    /// Get sweep interval as Duration
    ///
    /// Saturates for values that [`SchedulerConfig::validate`] rejects.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_minutes == 0 {
            return Err(ValidationError::InvalidSchedulerInterval);
        }
        if self.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(ValidationError::SchedulerIntervalTooLong);
        }
        if self.standard_threshold_minutes <= 0 {
            return Err(ValidationError::InvalidThreshold);
        }
        if self.extended_threshold_minutes < self.standard_threshold_minutes {
            return Err(ValidationError::ExtendedThresholdTooShort);
        }
        if self.extended_threshold_minutes > MAX_THRESHOLD_MINUTES {
            return Err(ValidationError::ThresholdTooLong);
        }
        if !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(ValidationError::InvalidUtcOffset);
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_minutes: default_interval_minutes(),
            standard_threshold_minutes: default_standard_threshold(),
            extended_threshold_minutes: default_extended_threshold(),
            utc_offset_minutes: 0,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval_minutes() -> u64 {
    2
}

fn default_standard_threshold() -> i64 {
    60
}

fn default_extended_threshold() -> i64 {
    120
}
