//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `PORTERO` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use portero::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod bot;
mod database;
mod error;
mod scheduler;

pub use bot::BotConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use scheduler::SchedulerConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bot configuration (token, approver, channels)
    pub bot: BotConfig,

    /// Database configuration (SQLite connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Scheduler configuration (sweep cadence)
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `PORTERO__BOT__TOKEN=...` -> `bot.token`
    /// - `PORTERO__BOT__CHANNEL_IDS=-100123,-100456` -> `bot.channel_ids`
    /// - `PORTERO__SCHEDULER__REMINDER_HOUR_UTC=9` -> `scheduler.reminder_hour_utc`
    ///
    /// A `.env` file is honored in development.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PORTERO")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bot.validate()?;
        self.database.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }
}
