//! Client-side state containers.
//!
//! Each store owns one slice of UI state (cart, wishlist, addresses, orders,
//! toasts, analytics) behind an async `RwLock` and talks to the backend
//! through the shared [`ApiClient`]. Cart and wishlist go through the
//! [`CartBackend`] / [`WishlistBackend`] traits so the merge logic can be
//! tested against in-memory fakes.

pub mod address;
pub mod analytics;
pub mod cart;
pub mod orders;
pub mod toast;
pub mod wishlist;

use async_trait::async_trait;

use tamarind_core::{CartItemId, ProductId, WishlistItemId};

use crate::api::ApiClient;
use crate::api::types::{
    CartEnvelope, CartItemCreate, CartItemUpdate, CartMutation, WishlistEnvelope, WishlistMutation,
};
use crate::error::Result;

pub use address::AddressStore;
pub use analytics::AnalyticsStore;
pub use cart::{CartLine, CartStore};
pub use orders::OrderStore;
pub use toast::{Toast, ToastLevel, ToastStore};
pub use wishlist::{WishlistEntry, WishlistStore};

/// Server-side cart operations the cart store depends on.
#[async_trait]
pub trait CartBackend: Send + Sync {
    async fn fetch_cart(&self) -> Result<CartEnvelope>;
    async fn add_cart_item(&self, create: &CartItemCreate) -> Result<CartMutation>;
    async fn update_cart_item(
        &self,
        id: CartItemId,
        update: &CartItemUpdate,
    ) -> Result<CartMutation>;
    async fn remove_cart_item(&self, id: CartItemId) -> Result<()>;
    async fn clear_cart(&self) -> Result<()>;
}

/// Server-side wishlist operations the wishlist store depends on.
#[async_trait]
pub trait WishlistBackend: Send + Sync {
    async fn fetch_wishlist(&self) -> Result<WishlistEnvelope>;
    async fn add_wishlist_item(&self, product_id: ProductId) -> Result<WishlistMutation>;
    async fn remove_wishlist_item(&self, id: WishlistItemId) -> Result<()>;
    async fn remove_wishlist_by_product(&self, product_id: ProductId) -> Result<()>;
}

#[async_trait]
impl CartBackend for ApiClient {
    async fn fetch_cart(&self) -> Result<CartEnvelope> {
        Self::fetch_cart(self).await
    }

    async fn add_cart_item(&self, create: &CartItemCreate) -> Result<CartMutation> {
        Self::add_cart_item(self, create).await
    }

    async fn update_cart_item(
        &self,
        id: CartItemId,
        update: &CartItemUpdate,
    ) -> Result<CartMutation> {
        Self::update_cart_item(self, id, update).await
    }

    async fn remove_cart_item(&self, id: CartItemId) -> Result<()> {
        Self::remove_cart_item(self, id).await
    }

    async fn clear_cart(&self) -> Result<()> {
        Self::clear_cart(self).await
    }
}

#[async_trait]
impl WishlistBackend for ApiClient {
    async fn fetch_wishlist(&self) -> Result<WishlistEnvelope> {
        Self::fetch_wishlist(self).await
    }

    async fn add_wishlist_item(&self, product_id: ProductId) -> Result<WishlistMutation> {
        Self::add_wishlist_item(self, product_id).await
    }

    async fn remove_wishlist_item(&self, id: WishlistItemId) -> Result<()> {
        Self::remove_wishlist_item(self, id).await
    }

    async fn remove_wishlist_by_product(&self, product_id: ProductId) -> Result<()> {
        Self::remove_wishlist_by_product(self, product_id).await
    }
}
