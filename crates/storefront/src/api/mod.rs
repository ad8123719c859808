//! Storefront REST API client.
//!
//! Wraps `reqwest` with the session token lifecycle:
//!
//! - attach the access token as a bearer credential when a session is held
//! - on a 401 response, attempt exactly one token refresh and retry the
//!   original request once with the new token
//! - if the refresh itself fails, clear the session and surface
//!   [`ApiError::SessionExpired`] - the caller must log in again
//! - a 401 with no session held is surfaced directly so failed login
//!   attempts never force a logout
//!
//! Idempotent reads retry on network errors up to the configured attempt
//! count; mutations are sent exactly once (plus the single 401 retry).

pub mod endpoints;
pub mod session;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use tamarind_core::{AddressId, CartItemId, Email, OrderId, ProductId, WishlistItemId};

use crate::config::StorefrontConfig;
use crate::error::{ApiError, Result};

use session::{SessionHandle, SessionTokens};
use types::{
    Address, AddressEnvelope, AddressInput, AddressesEnvelope, AnalyticsCounts, AuthResponse,
    CartEnvelope, CartItemCreate, CartItemUpdate, CartMutation, ChangePassword, ErrorBody,
    LoginRequest, NewUser, Order, OrderCreate, OrderEnvelope, OrdersEnvelope, ProductEnvelope,
    ProductPage, ProductQuery, ProductSummary, ProfileUpdate, RefreshResponse, Section,
    SectionsEnvelope, User, UserEnvelope, WishlistCheck, WishlistEnvelope, WishlistMutation,
};

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Tamarind customer REST API.
///
/// Cheap to clone; all clones share the HTTP connection pool and the session
/// token cell.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    /// API root including the prefix, always ending in `/`.
    api_url: String,
    timeout: Duration,
    retry_attempts: u32,
    retry_delay: Duration,
    session: SessionHandle,
}

impl ApiClient {
    /// Create a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the configured
    /// base URL and prefix do not form a valid URL.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let api_url = config
            .api_url()
            .map_err(|e| ApiError::Validation(e.to_string()))?
            .to_string();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                api_url,
                timeout: config.timeout,
                retry_attempts: config.retry_attempts.max(1),
                retry_delay: config.retry_delay,
                session: SessionHandle::new(),
            }),
        })
    }

    /// Handle to the session tokens shared with the auth store.
    #[must_use]
    pub fn session(&self) -> SessionHandle {
        self.inner.session.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.api_url)
    }

    // =========================================================================
    // Request core
    // =========================================================================

    fn map_send_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.inner.timeout)
        } else {
            ApiError::Http(error)
        }
    }

    /// Send a request with bearer attach and the single refresh-and-retry.
    ///
    /// The builder closure is invoked again for the retry so the request body
    /// is rebuilt rather than cloned.
    async fn execute<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let tokens = self.inner.session.get().await;

        let mut request = build(&self.inner.client);
        if let Some(tokens) = &tokens {
            request = request.bearer_auth(tokens.access_token.expose_secret());
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        // 401 without a session: surface directly. Login attempts land here
        // and must not trigger a logout.
        if tokens.is_none() {
            return Ok(response);
        }

        if !self.try_refresh().await {
            self.inner.session.clear().await;
            return Err(ApiError::SessionExpired);
        }

        let fresh = self
            .inner
            .session
            .get()
            .await
            .ok_or(ApiError::SessionExpired)?;

        debug!("access token refreshed, retrying request once");

        build(&self.inner.client)
            .bearer_auth(fresh.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))
    }

    /// Attempt a token refresh using the held refresh token.
    ///
    /// Returns `true` when the access token was replaced. Any failure mode
    /// (network, non-success status, bad body) returns `false`; the caller
    /// decides whether to clear the session.
    async fn try_refresh(&self) -> bool {
        let Some(tokens) = self.inner.session.get().await else {
            return false;
        };

        let result = self
            .inner
            .client
            .post(self.url(endpoints::AUTH_REFRESH))
            .bearer_auth(tokens.refresh_token.expose_secret())
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<RefreshResponse>().await {
                    Ok(body) => {
                        self.inner.session.set_access_token(body.access_token).await;
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to decode refresh response");
                        false
                    }
                }
            }
            Ok(response) => {
                debug!(status = %response.status(), "token refresh rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "token refresh request failed");
                false
            }
        }
    }

    /// Decode a JSON response, converting error statuses into `ApiError`.
    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(ApiError::Http);
        }

        Err(Self::status_error(status, response).await)
    }

    /// Treat any success status as `Ok(())`, discarding the body.
    async fn expect_ok(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::status_error(status, response).await)
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> ApiError {
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
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// GET with retry on network errors (idempotent reads only).
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut last_error = None;

        for attempt in 0..self.inner.retry_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.inner.retry_delay).await;
            }

            let result = self
                .execute(|client| client.get(self.url(path)).query(query))
                .await;

            match result {
                Ok(response) => return self.decode(response).await,
                Err(e @ (ApiError::Http(_) | ApiError::Timeout(_))) => {
                    debug!(path, attempt, error = %e, "read failed, may retry");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(ApiError::Timeout(self.inner.timeout)))
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .execute(|client| client.post(self.url(path)).json(body))
            .await?;
        self.decode(response).await
    }

    async fn put_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .execute(|client| client.put(self.url(path)).json(body))
            .await?;
        self.decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self.execute(|client| client.delete(self.url(path))).await?;
        self.expect_ok(response).await
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// On success the returned tokens are stored in the shared session
    /// handle. Reconciliation of cart and wishlist is the session's job,
    /// not the client's.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<AuthResponse> {
        // Sent without a bearer credential: a stale session must not leak
        // into a fresh login.
        let response = self
            .inner
            .client
            .post(self.url(endpoints::AUTH_LOGIN))
            .json(&LoginRequest {
                email: email.as_str(),
                password,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let auth: AuthResponse = self.decode(response).await?;
        self.store_tokens(&auth).await;
        Ok(auth)
    }

    /// Register a new account.
    ///
    /// When the backend returns tokens immediately, the session is stored
    /// and the caller should reconcile local state as after a login.
    ///
    /// # Errors
    ///
    /// Returns an error when validation fails or the email is taken.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn register(&self, new_user: &NewUser) -> Result<AuthResponse> {
        let response = self
            .inner
            .client
            .post(self.url(endpoints::AUTH_REGISTER))
            .json(new_user)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let auth: AuthResponse = self.decode(response).await?;
        self.store_tokens(&auth).await;
        Ok(auth)
    }

    async fn store_tokens(&self, auth: &AuthResponse) {
        if let (Some(access), Some(refresh)) = (&auth.access_token, &auth.refresh_token) {
            self.inner
                .session
                .set(SessionTokens::new(access.clone(), refresh.clone()))
                .await;
        }
    }

    /// Notify the backend of logout and drop the session.
    ///
    /// The server call is best-effort; local tokens are cleared regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if self.inner.session.is_authenticated().await {
            let result = self
                .execute(|client| client.post(self.url(endpoints::AUTH_LOGOUT)))
                .await;
            if let Err(e) = result {
                debug!(error = %e, "logout notification failed");
            }
        }
        self.inner.session.clear().await;
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an auth error when no valid session is held.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User> {
        let envelope: UserEnvelope = self.get_json(endpoints::AUTH_PROFILE, &[]).await?;
        Ok(envelope.user)
    }

    /// Update profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the session is invalid.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let envelope: UserEnvelope = self
            .put_json(endpoints::AUTH_UPDATE_PROFILE, update)
            .await?;
        Ok(envelope.user)
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns an error when the current password is wrong or the new one
    /// fails the backend's strength policy.
    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: &ChangePassword<'_>) -> Result<()> {
        let response = self
            .execute(|client| {
                client
                    .post(self.url(endpoints::AUTH_CHANGE_PASSWORD))
                    .json(change)
            })
            .await?;
        self.expect_ok(response).await
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// List the user's delivery addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_addresses(&self) -> Result<Vec<Address>> {
        let envelope: AddressesEnvelope = self.get_json(endpoints::ADDRESSES, &[]).await?;
        Ok(envelope.addresses)
    }

    /// Create a delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, input))]
    pub async fn create_address(&self, input: &AddressInput) -> Result<Address> {
        let envelope: AddressEnvelope = self.post_json(endpoints::ADDRESSES, input).await?;
        Ok(envelope.address)
    }

    /// Update a delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not exist or the request fails.
    #[instrument(skip(self, input), fields(address_id = %id))]
    pub async fn update_address(&self, id: AddressId, input: &AddressInput) -> Result<Address> {
        let envelope: AddressEnvelope = self.put_json(&endpoints::address(id), input).await?;
        Ok(envelope.address)
    }

    /// Delete a delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not exist or the request fails.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete_address(&self, id: AddressId) -> Result<()> {
        self.delete(&endpoints::address(id)).await
    }

    /// Mark an address as the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not exist or the request fails.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn set_default_address(&self, id: AddressId) -> Result<()> {
        let response = self
            .execute(|client| client.post(self.url(&endpoints::address_set_default(id))))
            .await?;
        self.expect_ok(response).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the authenticated user's server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<CartEnvelope> {
        self.get_json(endpoints::CART, &[]).await
    }

    /// Create a cart row server-side.
    ///
    /// The backend collapses rows with the same identity key by summing
    /// quantities, so this is also "increase quantity" for an existing key.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self, create), fields(product_id = %create.product_id))]
    pub async fn add_cart_item(&self, create: &CartItemCreate) -> Result<CartMutation> {
        self.post_json(endpoints::CART, create).await
    }

    /// Update a cart row's quantity or variants.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the request fails.
    #[instrument(skip(self, update), fields(item_id = %id))]
    pub async fn update_cart_item(
        &self,
        id: CartItemId,
        update: &CartItemUpdate,
    ) -> Result<CartMutation> {
        self.put_json(&endpoints::cart_item(id), update).await
    }

    /// Remove a cart row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the request fails.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn remove_cart_item(&self, id: CartItemId) -> Result<()> {
        self.delete(&endpoints::cart_item(id)).await
    }

    /// Empty the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<()> {
        self.delete(endpoints::CART_CLEAR).await
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Fetch the authenticated user's server-side wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_wishlist(&self) -> Result<WishlistEnvelope> {
        self.get_json(endpoints::WISHLIST, &[]).await
    }

    /// Add a product to the server-side wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_wishlist_item(&self, product_id: ProductId) -> Result<WishlistMutation> {
        self.post_json(
            endpoints::WISHLIST,
            &serde_json::json!({ "product_id": product_id }),
        )
        .await
    }

    /// Remove a wishlist row by its server id.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the request fails.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn remove_wishlist_item(&self, id: WishlistItemId) -> Result<()> {
        self.delete(&endpoints::wishlist_item(id)).await
    }

    /// Remove a wishlist row by product id (fallback when the server id is
    /// unknown, e.g. right after an optimistic add).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_wishlist_by_product(&self, product_id: ProductId) -> Result<()> {
        self.delete(&endpoints::wishlist_by_product(product_id)).await
    }

    /// Whether a product is on the server-side wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn check_wishlist(&self, product_id: ProductId) -> Result<bool> {
        let check: WishlistCheck = self
            .get_json(&endpoints::wishlist_check(product_id), &[])
            .await?;
        Ok(check.in_wishlist)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let envelope: OrdersEnvelope = self.get_json(endpoints::ORDERS, &[]).await?;
        Ok(envelope.orders)
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or belongs to another
    /// user.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order> {
        let envelope: OrderEnvelope = self.get_json(&endpoints::order(id), &[]).await?;
        Ok(envelope.order)
    }

    /// Place an order (checkout).
    ///
    /// # Errors
    ///
    /// Returns an error if the address or any product is invalid.
    #[instrument(skip(self, create), fields(address_id = %create.address_id))]
    pub async fn create_order(&self, create: &OrderCreate) -> Result<Order> {
        let envelope: OrderEnvelope = self.post_json(endpoints::ORDERS, create).await?;
        Ok(envelope.order)
    }

    /// Cancel an order that is still cancellable.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be cancelled.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order> {
        let response = self
            .execute(|client| client.post(self.url(&endpoints::order_cancel(id))))
            .await?;
        let envelope: OrderEnvelope = self.decode(response).await?;
        Ok(envelope.order)
    }

    /// Download the binary PDF receipt for an order.
    ///
    /// Requires a valid access token; without one the backend answers 401
    /// and this surfaces as an auth error, never as a malformed download.
    ///
    /// # Errors
    ///
    /// Returns an auth error without a session, or `NotFound` for an order
    /// owned by someone else.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn download_receipt(&self, id: OrderId) -> Result<Vec<u8>> {
        let response = self
            .execute(|client| client.get(self.url(&endpoints::order_receipt(id))))
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }

        Ok(response.bytes().await?.to_vec())
    }

    // =========================================================================
    // Products and sections (read-only)
    // =========================================================================

    /// List products with optional filtering, sorting, and pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage> {
        self.get_json(endpoints::PRODUCTS, &query.to_pairs()).await
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown or inactive products.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<ProductSummary> {
        let envelope: ProductEnvelope = self.get_json(&endpoints::product(id), &[]).await?;
        Ok(envelope.product)
    }

    /// Fetch one product by slug.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown or inactive products.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<ProductSummary> {
        let envelope: ProductEnvelope =
            self.get_json(&endpoints::product_by_slug(slug), &[]).await?;
        Ok(envelope.product)
    }

    /// List products in a section by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query), fields(category = %category_slug))]
    pub async fn list_products_by_category(
        &self,
        category_slug: &str,
        query: &ProductQuery,
    ) -> Result<ProductPage> {
        self.get_json(
            &endpoints::products_by_category(category_slug),
            &query.to_pairs(),
        )
        .await
    }

    /// Featured products for the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self, limit: u32) -> Result<ProductPage> {
        self.get_json(
            endpoints::PRODUCTS_FEATURED,
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// Newest products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn new_arrivals(&self, limit: u32) -> Result<ProductPage> {
        self.get_json(
            endpoints::PRODUCTS_NEW_ARRIVALS,
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// List storefront sections.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_sections(&self) -> Result<Vec<Section>> {
        let envelope: SectionsEnvelope = self.get_json(endpoints::SECTIONS, &[]).await?;
        Ok(envelope.sections)
    }

    // =========================================================================
    // Analytics
    // =========================================================================

    /// Fetch the public view/click counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn fetch_analytics(&self) -> Result<AnalyticsCounts> {
        self.get_json(endpoints::ANALYTICS, &[]).await
    }

    /// Record a page view (fire-and-forget semantics live in the store).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn record_view(&self) -> Result<()> {
        let response = self
            .execute(|client| client.post(self.url(endpoints::ANALYTICS_VIEW)))
            .await?;
        self.expect_ok(response).await
    }

    /// Record a click.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn record_click(&self) -> Result<()> {
        let response = self
            .execute(|client| client.post(self.url(endpoints::ANALYTICS_CLICK)))
            .await?;
        self.expect_ok(response).await
    }

    /// Backend health probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable.
    pub async fn health(&self) -> Result<()> {
        let response = self
            .execute(|client| client.get(self.url(endpoints::HEALTH)))
            .await?;
        self.expect_ok(response).await
    }
}
