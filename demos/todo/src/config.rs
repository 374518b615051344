//! Configuration for the to-do application.
//!
//! Loads configuration from environment variables with sensible defaults.

use composable_todo_runtime::StoreConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How many dispatched actions a slow action observer may fall behind
    /// (`TODO_ACTION_LOG_CAPACITY`, default 64)
    pub action_log_capacity: usize,
    /// Graceful shutdown timeout in seconds (`TODO_SHUTDOWN_TIMEOUT_SECS`, default 5)
    pub shutdown_timeout_secs: u64,
    /// First id handed out to new todos (`TODO_ID_START`, default 0)
    pub id_start: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            action_log_capacity: 64,
            shutdown_timeout_secs: 5,
            id_start: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables use the default; unparsable ones are logged and
    /// also fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            action_log_capacity: parse_or(
                &lookup,
                "TODO_ACTION_LOG_CAPACITY",
                defaults.action_log_capacity,
            ),
            shutdown_timeout_secs: parse_or(
                &lookup,
                "TODO_SHUTDOWN_TIMEOUT_SECS",
                defaults.shutdown_timeout_secs,
            ),
            id_start: parse_or(&lookup, "TODO_ID_START", defaults.id_start),
        }
    }

    /// Shutdown timeout as a [`Duration`]
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.action_log_capacity, self.shutdown_timeout())
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "Invalid configuration value, using default");
            default
        }),
    }
}
