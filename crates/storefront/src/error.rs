//! Error types for the storefront client.
//!
//! State-container methods return `Result<T, ApiError>` so callers branch on
//! the outcome instead of catching exceptions; no failure here is fatal to
//! the process. The worst case is stale or partially-synced local state until
//! the next successful operation.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the storefront API client and state containers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (DNS, connection, TLS, malformed response).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured per-request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend returned an error status with a message.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided error message, or the status reason when absent.
        message: String,
    },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was rejected as unauthenticated and no session was held.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A held session could not be refreshed; tokens have been cleared.
    #[error("session expired, please login again")]
    SessionExpired,

    /// Failed to decode a response body.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Client-side validation failed before the request was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Local state persistence failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Whether this error means the caller must re-authenticate.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::SessionExpired)
    }
}

/// Errors from the local persisted state file.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state file could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            status: 400,
            message: "Product ID is required".to_string(),
        };
        assert_eq!(err.to_string(), "API error (400): Product ID is required");

        let err = ApiError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "not found: product 123");
    }

    #[test]
    fn test_auth_error_classification() {
        assert!(ApiError::SessionExpired.is_auth_error());
        assert!(ApiError::Unauthorized("no token".into()).is_auth_error());
        assert!(
            !ApiError::Status {
                status: 500,
                message: "boom".into()
            }
            .is_auth_error()
        );
    }
}
