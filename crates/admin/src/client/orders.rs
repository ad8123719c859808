//! Order management operations.

use tracing::instrument;

use tamarind_core::{OrderId, OrderStatus};

use super::AdminClient;
use super::endpoints;
use super::types::{AdminOrder, AdminOrderEnvelope, AdminOrderPage, ListQuery, OrderStatusUpdate};
use crate::error::Result;

impl AdminClient {
    /// List all orders, with optional status filter and pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query))]
    pub async fn list_orders(&self, query: &ListQuery) -> Result<AdminOrderPage> {
        self.get_json(endpoints::ORDERS, &query.to_pairs()).await
    }

    /// Fetch one order with its customer and lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown orders.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: OrderId) -> Result<AdminOrder> {
        let envelope: AdminOrderEnvelope = self.get_json(&endpoints::order(id), &[]).await?;
        Ok(envelope.order)
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error for transitions the backend rejects.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<AdminOrder> {
        let envelope: AdminOrderEnvelope = self
            .put_json(&endpoints::order_status(id), &OrderStatusUpdate { status })
            .await?;
        Ok(envelope.order)
    }
}
