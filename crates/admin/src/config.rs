//! Admin client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TAMARIND_ADMIN_API_BASE_URL` - Backend origin; falls back to
//!   `TAMARIND_API_BASE_URL` when deployments share one origin
//!
//! ## Optional
//! - `TAMARIND_ADMIN_API_PREFIX` - Admin API path prefix (default: `/api/admin`)
//! - `TAMARIND_ADMIN_API_TIMEOUT_MS` - Per-request timeout (default: 30000;
//!   bulk uploads are slow)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_ADMIN_PREFIX: &str = "/api/admin";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin client configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Backend origin, without the API prefix.
    pub base_url: Url,
    /// Admin API path prefix appended to the origin.
    pub api_prefix: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no base URL is configured or a value is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let base_url = std::env::var("TAMARIND_ADMIN_API_BASE_URL")
            .or_else(|_| std::env::var("TAMARIND_API_BASE_URL"))
            .map_err(|_| {
                ConfigError::MissingEnvVar("TAMARIND_ADMIN_API_BASE_URL".to_string())
            })?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("TAMARIND_ADMIN_API_BASE_URL".to_string(), e.to_string())
        })?;

        let api_prefix = std::env::var("TAMARIND_ADMIN_API_PREFIX")
            .unwrap_or_else(|_| DEFAULT_ADMIN_PREFIX.to_string());

        let timeout_ms = match std::env::var("TAMARIND_ADMIN_API_TIMEOUT_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "TAMARIND_ADMIN_API_TIMEOUT_MS".to_string(),
                    e.to_string(),
                )
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            base_url,
            api_prefix,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Full admin API root: origin plus prefix, with a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the prefix does not form a valid URL.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let path = format!(
            "{}/",
            self.api_prefix.trim_start_matches('/').trim_end_matches('/')
        );
        self.base_url.join(&path).map_err(|e| {
            ConfigError::InvalidEnvVar("TAMARIND_ADMIN_API_PREFIX".to_string(), e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_joins_admin_prefix() {
        let config = AdminConfig {
            base_url: Url::parse("http://localhost:5000").expect("valid url"),
            api_prefix: DEFAULT_ADMIN_PREFIX.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };
        assert_eq!(
            config.api_url().expect("valid").as_str(),
            "http://localhost:5000/api/admin/"
        );
    }
}
