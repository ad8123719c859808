//! Storefront session: one customer's client-side world.
//!
//! Composes the API client, the catalogue client, and every state container
//! around a single shared token handle. Login and registration run the
//! cart/wishlist merge; logout drops local state without touching the server
//! copies. Nothing here is global: tests and multi-tenant embedders build as
//! many sessions as they need.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use tamarind_core::Email;

use crate::api::ApiClient;
use crate::api::session::SessionTokens;
use crate::api::types::{ChangePassword, NewUser, OrderCreate, ProfileUpdate, User};
use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::persist::{PersistedState, PersistedTokens, StateFile};
use crate::stores::{
    AddressStore, AnalyticsStore, CartStore, OrderStore, ToastStore, WishlistStore,
};

/// A customer session with all state containers wired up.
pub struct StorefrontSession {
    api: ApiClient,
    catalog: CatalogClient,
    cart: CartStore,
    wishlist: WishlistStore,
    addresses: AddressStore,
    orders: OrderStore,
    toasts: ToastStore,
    analytics: AnalyticsStore,
    state_file: StateFile,
    current_user: RwLock<Option<User>>,
}

impl StorefrontSession {
    /// Build a session from configuration and restore persisted local state
    /// (guest cart, wishlist, saved tokens).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub async fn new(config: &StorefrontConfig) -> Result<Self> {
        let api = ApiClient::new(config)?;
        let session = api.session();

        let cart = CartStore::new(Arc::new(api.clone()), session.clone());
        let wishlist = WishlistStore::new(Arc::new(api.clone()), session.clone());

        let state_file = StateFile::in_dir(&config.state_dir);
        let state = state_file.load();

        cart.load(state.cart).await;
        wishlist.load(state.wishlist).await;
        if let Some(tokens) = state.tokens {
            session
                .set(SessionTokens::new(tokens.access_token, tokens.refresh_token))
                .await;
        }

        Ok(Self {
            catalog: CatalogClient::new(api.clone()),
            addresses: AddressStore::new(api.clone()),
            orders: OrderStore::new(api.clone()),
            analytics: AnalyticsStore::new(api.clone()),
            toasts: ToastStore::new(),
            cart,
            wishlist,
            api,
            state_file,
            current_user: RwLock::new(None),
        })
    }

    // ======== Accessors ========

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    #[must_use]
    pub fn addresses(&self) -> &AddressStore {
        &self.addresses
    }

    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastStore {
        &self.toasts
    }

    #[must_use]
    pub fn analytics(&self) -> &AnalyticsStore {
        &self.analytics
    }

    /// The logged-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.current_user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated().await
    }

    // ======== Auth flows ========

    /// Log in and merge the guest cart and wishlist with the account's
    /// server-side copies.
    ///
    /// Merge failures do not fail the login; they are logged and retried on
    /// the next sync.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<User> {
        let auth = self.api.login(email, password).await?;
        *self.current_user.write().await = Some(auth.user.clone());

        self.reconcile_after_login().await;
        self.save_state().await?;

        info!(user_id = %auth.user.id, "logged in");
        Ok(auth.user)
    }

    /// Register a new account. When the backend opens a session immediately
    /// the same post-login reconciliation runs.
    ///
    /// # Errors
    ///
    /// Returns an error when registration is rejected.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn register(&self, new_user: &NewUser) -> Result<User> {
        let auth = self.api.register(new_user).await?;

        if self.is_authenticated().await {
            *self.current_user.write().await = Some(auth.user.clone());
            self.reconcile_after_login().await;
            self.save_state().await?;
        }

        Ok(auth.user)
    }

    async fn reconcile_after_login(&self) {
        if let Err(e) = self.cart.sync_with_backend().await {
            warn!(error = %e, "cart merge deferred");
        }
        if let Err(e) = self.wishlist.sync_with_backend().await {
            warn!(error = %e, "wishlist merge deferred");
        }
    }

    /// Log out: notify the backend best-effort, drop tokens, and clear every
    /// per-user container. Server-side cart and wishlist are untouched and
    /// will be waiting at the next login.
    ///
    /// # Errors
    ///
    /// Returns an error only if the state file cannot be written.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.api.logout().await;
        *self.current_user.write().await = None;

        self.cart.clear_on_logout().await;
        self.wishlist.clear_on_logout().await;
        self.addresses.clear_on_logout().await;
        self.orders.clear_on_logout().await;

        self.save_state().await?;
        info!("logged out");
        Ok(())
    }

    /// Restore the user profile for a session resumed from saved tokens.
    ///
    /// # Errors
    ///
    /// Returns an auth error when the saved tokens are no longer valid.
    #[instrument(skip(self))]
    pub async fn resume(&self) -> Result<User> {
        let user = self.api.profile().await?;
        *self.current_user.write().await = Some(user.clone());
        Ok(user)
    }

    /// Update the profile and keep the cached user in step.
    ///
    /// # Errors
    ///
    /// Returns an error when the update is rejected or no session is held.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let user = self.api.update_profile(update).await?;
        *self.current_user.write().await = Some(user.clone());
        Ok(user)
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the current password does not match.
    pub async fn change_password(&self, change: &ChangePassword<'_>) -> Result<()> {
        self.api.change_password(change).await
    }

    // ======== Checkout ========

    /// Place an order from the current cart and clear the cart on success.
    ///
    /// A failed checkout leaves the cart exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns an error when checkout is rejected.
    #[instrument(skip(self, create), fields(address_id = %create.address_id))]
    pub async fn checkout(&self, create: &OrderCreate) -> Result<crate::api::types::Order> {
        let order = self.orders.checkout(create).await?;
        self.cart.clear().await?;
        self.save_state().await?;
        info!(order_number = %order.order_number, "order placed");
        Ok(order)
    }

    // ======== Persistence ========

    /// Write cart, wishlist, and tokens to the state file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn save_state(&self) -> Result<()> {
        let tokens = self
            .api
            .session()
            .export()
            .await
            .map(|(access_token, refresh_token)| PersistedTokens {
                access_token,
                refresh_token,
            });

        let state = PersistedState {
            cart: self.cart.snapshot().await,
            wishlist: self.wishlist.snapshot().await,
            tokens,
        };

        self.state_file.save(&state)?;
        Ok(())
    }
}
