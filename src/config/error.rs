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
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid channel id list: {0}")]
    InvalidChannelIds(String),

    #[error("Database URL must be a sqlite:// URL")]
    InvalidDatabaseUrl,

    #[error("Reminder hour must be between 0 and 23")]
    InvalidReminderHour,

    #[error("Expiration sweep interval must be at least 1 second")]
    InvalidSweepInterval,
}
