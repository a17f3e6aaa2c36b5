//! Environment-driven configuration for the reminder daemon.

use crate::review::{
    adapters::DEFAULT_TELEGRAM_API,
    services::{DEFAULT_SWEEP_HOUR, SchedulerConfig, SchedulerConfigError},
};
use std::env;
use thiserror::Error;

/// Database connection string.
pub const DATABASE_URL_VAR: &str = "REVISIT_DATABASE_URL";
/// Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "REVISIT_TELEGRAM_TOKEN";
/// Optional Bot API base URL.
pub const TELEGRAM_API_VAR: &str = "REVISIT_TELEGRAM_API";
/// Optional daily sweep hour (UTC).
pub const SWEEP_HOUR_VAR: &str = "REVISIT_SWEEP_HOUR";
/// Optional connection pool size.
pub const POOL_SIZE_VAR: &str = "REVISIT_POOL_SIZE";

const DEFAULT_POOL_SIZE: u32 = 4;

/// Errors raised while reading daemon configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A variable could not be parsed.
    #[error("invalid value '{value}' for {key}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },

    /// Scheduler settings were rejected.
    #[error(transparent)]
    Scheduler(#[from] SchedulerConfigError),
}

/// Settings for the `revisitd` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// Bot token used by the Telegram gateway.
    pub telegram_token: String,
    /// Bot API base URL.
    pub telegram_api: String,
    /// Scheduler settings.
    pub scheduler: SchedulerConfig,
}

impl DaemonConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required key is missing or a value
    /// fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &'static str| read(key).ok_or(ConfigError::Missing(key));
        let parsed = |key: &'static str, default: u32| {
            read(key).map_or(Ok(default), |value| {
                value
                    .parse::<u32>()
                    .map_err(|_| ConfigError::Invalid { key, value })
            })
        };

        let sweep_hour = parsed(SWEEP_HOUR_VAR, DEFAULT_SWEEP_HOUR)?;
        Ok(Self {
            database_url: required(DATABASE_URL_VAR)?,
            pool_size: parsed(POOL_SIZE_VAR, DEFAULT_POOL_SIZE)?,
            telegram_token: required(TELEGRAM_TOKEN_VAR)?,
            telegram_api: read(TELEGRAM_API_VAR).unwrap_or_else(|| DEFAULT_TELEGRAM_API.to_owned()),
            scheduler: SchedulerConfig::with_sweep_hour(sweep_hour)?,
        })
    }
}
