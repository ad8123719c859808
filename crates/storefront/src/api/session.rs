//! Session token state shared between the API client and the auth store.
//!
//! Tokens are held in memory behind an async `RwLock` and treated as secrets;
//! the persisted state file is the only place they are exposed in plain text.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

/// Access and refresh tokens for an authenticated customer session.
#[derive(Clone)]
pub struct SessionTokens {
    /// Bearer token attached to outbound requests.
    pub access_token: SecretString,
    /// Token presented to the refresh endpoint when the access token is
    /// rejected.
    pub refresh_token: SecretString,
}

impl SessionTokens {
    /// Build tokens from the plain strings the backend returns.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token: SecretString::from(access_token),
            refresh_token: SecretString::from(refresh_token),
        }
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Shared handle to the current session tokens.
///
/// Cloned into the API client and every store that needs to know whether a
/// session is authenticated. One handle per surface: the admin client keeps
/// its own, fully isolated instance.
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<SessionTokens>>>,
}

impl SessionHandle {
    /// Create an empty (anonymous) handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session tokens.
    pub async fn set(&self, tokens: SessionTokens) {
        *self.inner.write().await = Some(tokens);
    }

    /// Swap only the access token, keeping the refresh token (used after a
    /// successful refresh).
    pub async fn set_access_token(&self, access_token: String) {
        let mut guard = self.inner.write().await;
        if let Some(tokens) = guard.as_mut() {
            tokens.access_token = SecretString::from(access_token);
        }
    }

    /// Drop the session (logout or failed refresh).
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// Snapshot the current tokens.
    pub async fn get(&self) -> Option<SessionTokens> {
        self.inner.read().await.clone()
    }

    /// Whether a session is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Expose the tokens as plain strings for the persisted state file.
    pub async fn export(&self) -> Option<(String, String)> {
        self.inner.read().await.as_ref().map(|t| {
            (
                t.access_token.expose_secret().to_string(),
                t.refresh_token.expose_secret().to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_starts_anonymous() {
        let handle = SessionHandle::new();
        assert!(!handle.is_authenticated().await);
        assert!(handle.get().await.is_none());
    }

    #[tokio::test]
    async fn test_set_access_token_keeps_refresh() {
        let handle = SessionHandle::new();
        handle
            .set(SessionTokens::new("old-access".into(), "refresh".into()))
            .await;
        handle.set_access_token("new-access".into()).await;

        let tokens = handle.get().await.expect("session held");
        assert_eq!(tokens.access_token.expose_secret(), "new-access");
        assert_eq!(tokens.refresh_token.expose_secret(), "refresh");
    }

    #[tokio::test]
    async fn test_clear_drops_session() {
        let handle = SessionHandle::new();
        handle
            .set(SessionTokens::new("a".into(), "r".into()))
            .await;
        handle.clear().await;
        assert!(!handle.is_authenticated().await);
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let tokens = SessionTokens::new("super-secret".into(), "also-secret".into());
        let debug = format!("{tokens:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
