//! Dashboard stats, reports, and the analytics override.

use tracing::instrument;

use super::AdminClient;
use super::endpoints;
use super::types::{AnalyticsCounts, DashboardStats, InventoryReport, OrderStats, SalesReport};
use crate::error::Result;

impl AdminClient {
    /// Aggregate counters for the dashboard landing page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_json(endpoints::STATS, &[]).await
    }

    /// Order counts per status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn order_stats(&self) -> Result<OrderStats> {
        self.get_json(endpoints::ORDER_STATS, &[]).await
    }

    /// Sales report, optionally limited to a period (e.g. `7d`, `30d`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn sales_report(&self, period: Option<&str>) -> Result<SalesReport> {
        let query: Vec<(&str, String)> = period
            .map(|p| vec![("period", p.to_string())])
            .unwrap_or_default();
        self.get_json(endpoints::REPORT_SALES, &query).await
    }

    /// Inventory report with out-of-stock and low-stock rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn inventory_report(&self) -> Result<InventoryReport> {
        self.get_json(endpoints::REPORT_INVENTORY, &[]).await
    }

    /// Overwrite the public view/click counters with absolute values.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(views = counts.views, clicks = counts.clicks))]
    pub async fn override_analytics(&self, counts: AnalyticsCounts) -> Result<AnalyticsCounts> {
        self.put_json(endpoints::ANALYTICS, &counts).await
    }
}
