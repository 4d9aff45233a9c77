//! Postal lookup client configuration.
//!
//! Defaults point at the public India Post lookup service. Override via
//! environment variables or explicit construction for testing.

use std::time::Duration;

use url::Url;

use crate::retry::RetryPolicy;

/// Default base URL of the PIN code lookup service.
pub const DEFAULT_BASE_URL: &str = "https://api.postalpincode.in";

/// Configuration for the postal lookup client.
#[derive(Debug, Clone)]
pub struct PostalConfig {
    /// Base URL; lookups go to `{base_url}/pincode/{pin}`.
    pub base_url: Url,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Retry policy for transport failures.
    pub retry: RetryPolicy,
}

impl PostalConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `POSTAL_API_URL` (default: `https://api.postalpincode.in`)
    /// - `POSTAL_TIMEOUT_SECS` (default: 10, must be positive)
    /// - `POSTAL_MAX_RETRIES` (default: 1)
    /// - `POSTAL_RETRY_DELAY_MS` (default: 250)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("POSTAL_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl("POSTAL_API_URL".to_string(), e.to_string()))?;

        let defaults = RetryPolicy::default();
        Ok(Self {
            base_url,
            timeout: env_timeout("POSTAL_TIMEOUT_SECS", 10)?,
            retry: RetryPolicy {
                max_retries: env_number("POSTAL_MAX_RETRIES", u64::from(defaults.max_retries))?
                    .try_into()
                    .map_err(|_| ConfigError::InvalidNumber("POSTAL_MAX_RETRIES".to_string()))?,
                base_delay: Duration::from_millis(env_number(
                    "POSTAL_RETRY_DELAY_MS",
                    defaults.base_delay.as_millis() as u64,
                )?),
            },
        })
    }

    /// Configuration pointing at a local mock server, with a short timeout
    /// and near-zero backoff.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?,
            timeout: Duration::from_secs(2),
            retry: RetryPolicy {
                max_retries: 1,
                base_delay: Duration::from_millis(10),
            },
        })
    }
}

fn env_number(var: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var.to_string())),
        Err(_) => Ok(default),
    }
}

/// Per-attempt timeout in seconds. Zero would fail every request.
fn env_timeout(var: &str, default: u64) -> Result<Duration, ConfigError> {
    match env_number(var, default)? {
        0 => Err(ConfigError::InvalidNumber(var.to_string())),
        secs => Ok(Duration::from_secs(secs)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid numeric value for {0}")]
    InvalidNumber(String),
}
