//! Scheduler configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Periodic sweep configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between expiration sweep passes
    #[serde(default = "default_expiration_sweep_secs")]
    pub expiration_sweep_secs: u64,

    /// UTC hour (0-23) at which the daily reminder pass fires
    #[serde(default = "default_reminder_hour_utc")]
    pub reminder_hour_utc: u32,
}

impl SchedulerConfig {
    /// Get the sweep interval as a Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.expiration_sweep_secs)
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.expiration_sweep_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        if self.reminder_hour_utc > 23 {
            return Err(ValidationError::InvalidReminderHour);
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            expiration_sweep_secs: default_expiration_sweep_secs(),
            reminder_hour_utc: default_reminder_hour_utc(),
        }
    }
}

fn default_expiration_sweep_secs() -> u64 {
    30
}

fn default_reminder_hour_utc() -> u32 {
    9
}
