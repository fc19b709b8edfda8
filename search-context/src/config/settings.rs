//! Environment settings.

use std::env;
use std::time::Duration;

use search_context_repository::config::{DEFAULT_PORT, DEFAULT_URL};
use search_context_repository::ConnectionConfig;
use tracing::warn;

use crate::AppError;

/// Default startup retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// How startup reacts when the search cluster doesn't answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if the cluster is unreachable.
    FailFast,
    /// Keep pinging the cluster until it answers.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Unknown values fall back to "retry".
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!(value = %value, "Invalid SEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Settings for the catalog process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Connection settings handed to the context registry.
    pub connection: ConnectionConfig,
    /// Startup connection behavior.
    pub connection_mode: ConnectionMode,
    /// Delay between startup pings in retry mode.
    pub retry_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            connection_mode: ConnectionMode::Retry,
            retry_interval: Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS),
        }
    }
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_URL`: Search engine URL without port (default: http://localhost)
    /// - `SEARCH_PORT`: Search engine port (default: 9200)
    /// - `SEARCH_USERNAME` / `SEARCH_PASSWORD`: Basic authentication
    /// - `SEARCH_API_KEY`: API key authentication
    /// - `SEARCH_CONTEXTS`: Comma-separated context names to register (default: all)
    /// - `SEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `SEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("SEARCH_URL").unwrap_or_else(|| DEFAULT_URL.to_string());
        let port = match lookup("SEARCH_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid SEARCH_PORT '{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        let contexts = lookup("SEARCH_CONTEXTS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let connection = ConnectionConfig {
            url,
            port,
            username: lookup("SEARCH_USERNAME"),
            password: lookup("SEARCH_PASSWORD"),
            api_key: lookup("SEARCH_API_KEY"),
            contexts,
        };

        let connection_mode = lookup("SEARCH_CONNECTION_MODE")
            .map(|raw| ConnectionMode::parse(&raw))
            .unwrap_or(ConnectionMode::Retry);
        let retry_interval = lookup("SEARCH_RETRY_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        Ok(Self {
            connection,
            connection_mode,
            retry_interval: Duration::from_secs(retry_interval),
        })
    }
}
