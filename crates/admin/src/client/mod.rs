//! Admin REST API client.
//!
//! Same token lifecycle as the customer client - bearer attach, one refresh
//! and one retry on 401 - but with a completely separate token pair held in
//! this client. An admin logging in never disturbs a customer session in the
//! same process.

pub mod endpoints;
pub mod types;

mod orders;
mod products;
mod reports;
mod sections;
mod users;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::config::AdminConfig;
use crate::error::{AdminApiError, Result};

use types::{AdminAuthResponse, AdminUser, AdminUserEnvelope, ErrorBody, RefreshResponse};

/// Admin session tokens, cached in memory.
#[derive(Clone)]
pub struct AdminTokens {
    access_token: SecretString,
    refresh_token: SecretString,
}

impl std::fmt::Debug for AdminTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Client for the Tamarind admin REST API.
///
/// Cheap to clone; clones share the connection pool and token cache.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    /// Admin API root including the prefix, always ending in `/`.
    api_url: String,
    timeout: std::time::Duration,
    /// In-memory token cache.
    tokens: RwLock<Option<AdminTokens>>,
}

impl AdminClient {
    /// Create a new admin client from configuration, without a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the configured
    /// base URL and prefix do not form a valid URL.
    pub fn new(config: &AdminConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let api_url = config
            .api_url()
            .map_err(|e| AdminApiError::Validation(e.to_string()))?
            .to_string();

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                api_url,
                timeout: config.timeout,
                tokens: RwLock::new(None),
            }),
        })
    }

    /// Whether an admin session is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.tokens.read().await.is_some()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.api_url)
    }

    // =========================================================================
    // Request core
    // =========================================================================

    fn map_send_error(&self, error: reqwest::Error) -> AdminApiError {
        if error.is_timeout() {
            AdminApiError::Timeout(self.inner.timeout)
        } else {
            AdminApiError::Http(error)
        }
    }

    /// Send a request with bearer attach and the single refresh-and-retry.
    pub(crate) async fn execute<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let access = {
            let tokens = self.inner.tokens.read().await;
            tokens
                .as_ref()
                .map(|t| t.access_token.expose_secret().to_string())
        };

        let mut request = build(&self.inner.client);
        if let Some(access) = &access {
            request = request.bearer_auth(access);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        if response.status() != StatusCode::UNAUTHORIZED || access.is_none() {
            return Ok(response);
        }

        if !self.try_refresh().await {
            *self.inner.tokens.write().await = None;
            return Err(AdminApiError::SessionExpired);
        }

        let fresh = {
            let tokens = self.inner.tokens.read().await;
            tokens
                .as_ref()
                .map(|t| t.access_token.expose_secret().to_string())
        }
        .ok_or(AdminApiError::SessionExpired)?;

        debug!("admin access token refreshed, retrying request once");

        build(&self.inner.client)
            .bearer_auth(fresh)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))
    }

    async fn try_refresh(&self) -> bool {
        let refresh = {
            let tokens = self.inner.tokens.read().await;
            tokens
                .as_ref()
                .map(|t| t.refresh_token.expose_secret().to_string())
        };
        let Some(refresh) = refresh else {
            return false;
        };

        let result = self
            .inner
            .client
            .post(self.url(endpoints::AUTH_REFRESH))
            .bearer_auth(refresh)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<RefreshResponse>().await {
                    Ok(body) => {
                        let mut tokens = self.inner.tokens.write().await;
                        if let Some(tokens) = tokens.as_mut() {
                            tokens.access_token = SecretString::from(body.access_token);
                        }
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to decode admin refresh response");
                        false
                    }
                }
            }
            Ok(response) => {
                debug!(status = %response.status(), "admin token refresh rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "admin token refresh request failed");
                false
            }
        }
    }

    pub(crate) async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(AdminApiError::Http);
        }
        Err(Self::status_error(status, response).await)
    }

    pub(crate) async fn expect_ok(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::status_error(status, response).await)
    }

    pub(crate) async fn status_error(
        status: StatusCode,
        response: reqwest::Response,
    ) -> AdminApiError {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AdminApiError::Unauthorized(message)
            }
            StatusCode::NOT_FOUND => AdminApiError::NotFound(message),
            _ => AdminApiError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .execute(|client| client.get(self.url(path)).query(query))
            .await?;
        self.decode(response).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .execute(|client| client.post(self.url(path)).json(body))
            .await?;
        self.decode(response).await
    }

    pub(crate) async fn put_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .execute(|client| client.put(self.url(path)).json(body))
            .await?;
        self.decode(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let response = self.execute(|client| client.delete(self.url(path))).await?;
        self.expect_ok(response).await
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Authenticate as an admin with email and password.
    ///
    /// Stores the obtained token pair in the client for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for bad credentials or a non-admin account.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AdminUser> {
        let response = self
            .inner
            .client
            .post(self.url(endpoints::AUTH_LOGIN))
            .json(&serde_json::json!({
                "email": email,
                "password": password.expose_secret(),
            }))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let auth: AdminAuthResponse = self.decode(response).await?;

        *self.inner.tokens.write().await = Some(AdminTokens {
            access_token: SecretString::from(auth.access_token),
            refresh_token: SecretString::from(auth.refresh_token),
        });

        Ok(auth.user)
    }

    /// Notify the backend of logout and drop the cached tokens.
    ///
    /// The server call is best-effort; local tokens are cleared regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if self.is_authenticated().await {
            let result = self
                .execute(|client| client.post(self.url(endpoints::AUTH_LOGOUT)))
                .await;
            if let Err(e) = result {
                debug!(error = %e, "admin logout notification failed");
            }
        }
        *self.inner.tokens.write().await = None;
    }

    /// Fetch the authenticated admin's profile.
    ///
    /// # Errors
    ///
    /// Returns an auth error when no valid admin session is held.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<AdminUser> {
        let envelope: AdminUserEnvelope = self.get_json(endpoints::AUTH_PROFILE, &[]).await?;
        Ok(envelope.user)
    }
}
