//! Error types for the admin client.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the admin API client.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// Network-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured per-request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend returned an error status with a message.
    #[error("admin API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided error message.
        message: String,
    },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Admin credentials rejected, or the caller is not an admin.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A held admin session could not be refreshed; tokens have been
    /// cleared.
    #[error("admin session expired, please login again")]
    SessionExpired,

    /// Failed to decode a response body.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Client-side validation failed before the request was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Local file could not be read for an upload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdminApiError {
    /// Whether this error means the admin must re-authenticate.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::SessionExpired)
    }
}

/// Result type alias for `AdminApiError`.
pub type Result<T> = std::result::Result<T, AdminApiError>;
