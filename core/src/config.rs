//! # Dashboard Configuration
//!
//! Loaded from environment variables, with defaults for everything, and
//! validated before use so a misconfigured dashboard fails at startup.
//!
//! | variable | default |
//! |---|---|
//! | `WINTENDER_API_URL` | `http://localhost:8080/api` |
//! | `WINTENDER_TIMEOUT_SECS` | `10` |
//! | `WINTENDER_LIST_REFETCH_MS` | `3000000` |
//! | `WINTENDER_HEALTH_REFETCH_MS` | `300000` |
//! | `WINTENDER_SESSION_KEY` | `sr-dash-client` |
//! | `WINTENDER_LOG` | `wintender_core=info` |

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::session::DEFAULT_SESSION_KEY;

/// Refetch interval of the list queries (users, entities, errors, chat): 50 minutes.
pub const DEFAULT_LIST_REFETCH_MS: u64 = 3_000_000;

/// Refetch interval of the health queries (summary, actuator): 5 minutes.
pub const DEFAULT_HEALTH_REFETCH_MS: u64 = 300_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got {value:?}")]
    WrongFormat { name: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub list_refetch_interval: Duration,
    pub health_refetch_interval: Duration,
    pub session_key: String,
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            request_timeout: Duration::from_secs(10),
            list_refetch_interval: Duration::from_millis(DEFAULT_LIST_REFETCH_MS),
            health_refetch_interval: Duration::from_millis(DEFAULT_HEALTH_REFETCH_MS),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            log_filter: "wintender_core=info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup, then validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |name: &'static str| -> Result<Option<u64>, ConfigError> {
            match lookup(name) {
                None => Ok(None),
                Some(value) => value
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| ConfigError::WrongFormat { name, value }),
            }
        };

        let config = Self {
            api_base_url: lookup("WINTENDER_API_URL").unwrap_or(defaults.api_base_url),
            request_timeout: number("WINTENDER_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            list_refetch_interval: number("WINTENDER_LIST_REFETCH_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.list_refetch_interval),
            health_refetch_interval: number("WINTENDER_HEALTH_REFETCH_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.health_refetch_interval),
            session_key: lookup("WINTENDER_SESSION_KEY").unwrap_or(defaults.session_key),
            log_filter: lookup("WINTENDER_LOG").unwrap_or(defaults.log_filter),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "WINTENDER_API_URL must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("WINTENDER_TIMEOUT_SECS must be positive".to_string()));
        }
        if self.list_refetch_interval.is_zero() || self.health_refetch_interval.is_zero() {
            return Err(ConfigError::Invalid("refetch intervals must be positive".to_string()));
        }
        if self.session_key.trim().is_empty() {
            return Err(ConfigError::Invalid("WINTENDER_SESSION_KEY must not be empty".to_string()));
        }
        Ok(())
    }
}
