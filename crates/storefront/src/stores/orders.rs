//! Order history state container.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::instrument;

use tamarind_core::OrderId;

use crate::api::ApiClient;
use crate::api::types::{Order, OrderCreate};
use crate::error::Result;

/// Order state container. Orders are immutable server-side facts; the store
/// caches the listing and exposes the few mutations customers have.
#[derive(Clone)]
pub struct OrderStore {
    api: ApiClient,
    orders: Arc<RwLock<Vec<Order>>>,
}

impl OrderStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            orders: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of the cached orders, newest first.
    pub async fn snapshot(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    /// Reload the order history from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cache is left untouched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let orders = self.api.list_orders().await?;
        *self.orders.write().await = orders;
        Ok(())
    }

    /// Fetch one order, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: OrderId) -> Result<Order> {
        self.api.get_order(id).await
    }

    /// Place an order and prepend it to the cached history.
    ///
    /// Clearing the cart afterwards is the session's responsibility, so a
    /// failed checkout never loses the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if checkout is rejected.
    #[instrument(skip(self, create), fields(address_id = %create.address_id))]
    pub async fn checkout(&self, create: &OrderCreate) -> Result<Order> {
        let order = self.api.create_order(create).await?;
        self.orders.write().await.insert(0, order.clone());
        Ok(order)
    }

    /// Cancel an order and update the cached row.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is no longer cancellable.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel(&self, id: OrderId) -> Result<Order> {
        let cancelled = self.api.cancel_order(id).await?;
        let mut orders = self.orders.write().await;
        if let Some(slot) = orders.iter_mut().find(|o| o.id == id) {
            *slot = cancelled.clone();
        }
        Ok(cancelled)
    }

    /// Download the PDF receipt bytes for an order.
    ///
    /// # Errors
    ///
    /// Returns an auth error without a session, `NotFound` for foreign
    /// orders.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn download_receipt(&self, id: OrderId) -> Result<Vec<u8>> {
        self.api.download_receipt(id).await
    }

    /// Drop cached orders on logout.
    pub async fn clear_on_logout(&self) {
        self.orders.write().await.clear();
    }
}
