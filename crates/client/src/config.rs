//! Client configuration.

use paceboard_core::DEFAULT_TRANSACTIONS_TARGET;
use std::time::Duration;

/// Default backend URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Default refresh interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Environment variable names.
pub mod env_keys {
    /// Backend base URL
    pub const API_URL: &str = "PACEBOARD_API_URL";
    /// Per-request timeout in seconds
    pub const TIMEOUT_SECS: &str = "PACEBOARD_TIMEOUT_SECS";
    /// Refresh interval in seconds
    pub const REFRESH_SECS: &str = "PACEBOARD_REFRESH_SECS";
    /// Monthly transaction target
    pub const TRANSACTIONS_TARGET: &str = "PACEBOARD_TRANSACTIONS_TARGET";
}

/// Errors in configuration values.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// Base URL is not http(s)
    #[error("invalid base URL `{0}`: expected http:// or https://")]
    InvalidUrl(String),

    /// A numeric setting failed to parse
    #[error("invalid value for {key}: `{value}`")]
    InvalidNumber {
        /// Setting name
        key: String,
        /// Offending value
        value: String,
    },

    /// A duration setting was zero
    #[error("{0} must be greater than zero")]
    ZeroDuration(String),
}

/// Settings for talking to the dashboard backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,

    /// Upper bound on one request
    pub request_timeout: Duration,

    /// Time between scheduled refreshes
    pub refresh_interval: Duration,

    /// Monthly transaction target when the backend sends none
    pub transactions_target: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            transactions_target: DEFAULT_TRANSACTIONS_TARGET,
        }
    }
}

impl ClientConfig {
    /// Build from process environment over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup over the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(env_keys::API_URL) {
            config = config.with_base_url(url)?;
        }
        if let Some(raw) = lookup(env_keys::TIMEOUT_SECS) {
            config.request_timeout = parse_secs(env_keys::TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(env_keys::REFRESH_SECS) {
            config.refresh_interval = parse_secs(env_keys::REFRESH_SECS, &raw)?;
        }
        if let Some(raw) = lookup(env_keys::TRANSACTIONS_TARGET) {
            config.transactions_target = parse_target(env_keys::TRANSACTIONS_TARGET, &raw)?;
        }

        Ok(config)
    }

    /// Replace the base URL, normalizing trailing slashes.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');

        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(url));
        }

        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Full URL of the dashboard endpoint.
    pub fn dashboard_url(&self) -> String {
        format!("{}/api/dashboard", self.base_url)
    }
}

/// Parse a positive whole number of seconds.
pub fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: raw.to_string(),
    })?;

    if secs == 0 {
        return Err(ConfigError::ZeroDuration(key.to_string()));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse a non-negative target figure.
pub fn parse_target(key: &str, raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
