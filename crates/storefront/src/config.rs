//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TAMARIND_API_BASE_URL` - Backend origin (e.g., `https://api.tamarind.shop`)
//!
//! ## Optional
//! - `TAMARIND_API_PREFIX` - API path prefix (default: `/api`)
//! - `TAMARIND_API_TIMEOUT_MS` - Per-request timeout (default: 10000)
//! - `TAMARIND_API_RETRY_ATTEMPTS` - Retry count for idempotent reads (default: 3)
//! - `TAMARIND_API_RETRY_DELAY_MS` - Delay between retries (default: 1000)
//! - `TAMARIND_STATE_DIR` - Directory for the persisted state file
//!   (default: `.tamarind` under the user's home directory)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_PREFIX: &str = "/api";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend origin, without the API prefix.
    pub base_url: Url,
    /// API path prefix appended to the origin (e.g., `/api`).
    pub api_prefix: String,
    /// Per-request timeout. A request exceeding it is aborted and surfaced
    /// as a timeout error.
    pub timeout: Duration,
    /// Retry attempts for idempotent reads.
    pub retry_attempts: u32,
    /// Delay between retries.
    pub retry_delay: Duration,
    /// Directory holding the persisted local state file.
    pub state_dir: PathBuf,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("TAMARIND_API_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("TAMARIND_API_BASE_URL".to_string(), e.to_string())
        })?;

        let api_prefix = get_env_or_default("TAMARIND_API_PREFIX", DEFAULT_API_PREFIX);

        let timeout_ms = parse_env_or("TAMARIND_API_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        let retry_attempts = parse_env_or("TAMARIND_API_RETRY_ATTEMPTS", DEFAULT_RETRY_ATTEMPTS)?;
        let retry_delay_ms = parse_env_or("TAMARIND_API_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?;

        let state_dir = std::env::var("TAMARIND_STATE_DIR").map_or_else(
            |_| default_state_dir(),
            |dir| Ok(PathBuf::from(dir)),
        )?;

        let sentry_dsn = std::env::var("SENTRY_DSN").ok();

        Ok(Self {
            base_url,
            api_prefix,
            timeout: Duration::from_millis(timeout_ms),
            retry_attempts,
            retry_delay: Duration::from_millis(retry_delay_ms),
            state_dir,
            sentry_dsn,
        })
    }

    /// Full API root: origin plus prefix (e.g., `https://api.tamarind.shop/api`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the prefix does not form a valid URL.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.base_url.clone();
        let path = format!(
            "{}/",
            self.api_prefix.trim_start_matches('/').trim_end_matches('/')
        );
        url = url.join(&path).map_err(|e| {
            ConfigError::InvalidEnvVar("TAMARIND_API_PREFIX".to_string(), e.to_string())
        })?;
        Ok(url)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Default state directory: `.tamarind` under the user's home directory.
fn default_state_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ConfigError::MissingEnvVar("TAMARIND_STATE_DIR (or HOME)".to_string()))?;
    Ok(PathBuf::from(home).join(".tamarind"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base: &str, prefix: &str) -> StorefrontConfig {
        StorefrontConfig {
            base_url: Url::parse(base).expect("valid url"),
            api_prefix: prefix.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            state_dir: PathBuf::from("/tmp/tamarind-test"),
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_api_url_joins_prefix() {
        let config = test_config("https://api.tamarind.shop", "/api");
        assert_eq!(
            config.api_url().expect("valid").as_str(),
            "https://api.tamarind.shop/api/"
        );
    }

    #[test]
    fn test_api_url_normalizes_slashes() {
        let config = test_config("http://localhost:5000", "api/");
        assert_eq!(
            config.api_url().expect("valid").as_str(),
            "http://localhost:5000/api/"
        );
    }
}
