//! Wire types for the admin REST API.
//!
//! Defined separately from the customer client's types: the admin surface
//! exposes fields customers never see (inactive rows, per-user counters,
//! revenue figures) and the two surfaces version independently.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tamarind_core::{
    AddressId, Email, OrderId, OrderStatus, Price, ProductId, SectionId, UserId, UserRole,
};

// =============================================================================
// Error envelope
// =============================================================================

/// Error body the backend attaches to non-success statuses.
#[derive(Debug, Deserialize, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best-available error message.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

// =============================================================================
// Authentication
// =============================================================================

/// Admin account profile.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// Response from admin login.
#[derive(Debug, Deserialize)]
pub struct AdminAuthResponse {
    pub user: AdminUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Response from the admin token refresh endpoint.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminUserEnvelope {
    pub user: AdminUser,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Aggregate counters for the dashboard landing page.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub pending_orders: u64,
    #[serde(default)]
    pub low_stock_products: u64,
}

/// Order counts per status.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OrderStats {
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub confirmed: u64,
    #[serde(default)]
    pub shipped: u64,
    #[serde(default)]
    pub delivered: u64,
    #[serde(default)]
    pub cancelled: u64,
}

// =============================================================================
// Users
// =============================================================================

/// Customer row as listed in user management.
#[derive(Debug, Clone, Deserialize)]
pub struct ManagedUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub order_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Paginated user listing.
#[derive(Debug, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub users: Vec<ManagedUser>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ManagedUserEnvelope {
    pub user: ManagedUser,
}

/// User update payload; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// =============================================================================
// Products
// =============================================================================

/// Product as seen by admins (includes inactive rows).
#[derive(Debug, Clone, Deserialize)]
pub struct AdminProduct {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub section_id: Option<SectionId>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Paginated admin product listing.
#[derive(Debug, Deserialize)]
pub struct AdminProductPage {
    #[serde(default)]
    pub products: Vec<AdminProduct>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminProductEnvelope {
    pub product: AdminProduct,
}

/// Product create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Outcome of a bulk CSV product upload.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUploadReport {
    #[serde(default)]
    pub created: u32,
    #[serde(default)]
    pub updated: u32,
    #[serde(default)]
    pub failed: u32,
    /// Per-row error messages for rejected rows.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Response from a single image upload.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkImageUpload {
    #[serde(default)]
    pub urls: Vec<String>,
}

// =============================================================================
// Sections
// =============================================================================

/// Section as seen by admins.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSection {
    pub id: SectionId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub product_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminSectionsEnvelope {
    #[serde(default)]
    pub sections: Vec<AdminSection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminSectionEnvelope {
    pub section: AdminSection,
}

/// Section create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// New section ordering, first id displayed first.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReorder {
    pub section_ids: Vec<SectionId>,
}

// =============================================================================
// Orders
// =============================================================================

/// Order line as listed in admin order details.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminOrderLine {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_title: Option<String>,
    pub quantity: u32,
    pub price: Price,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Order as seen by admins, with the owning customer attached.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminOrder {
    pub id: OrderId,
    pub order_number: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub total_amount: Price,
    #[serde(default)]
    pub user: Option<ManagedUser>,
    #[serde(default)]
    pub address_id: Option<AddressId>,
    #[serde(default)]
    pub items: Vec<AdminOrderLine>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Paginated admin order listing.
#[derive(Debug, Deserialize)]
pub struct AdminOrderPage {
    #[serde(default)]
    pub orders: Vec<AdminOrder>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminOrderEnvelope {
    pub order: AdminOrder,
}

/// Status transition payload.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// Listing queries
// =============================================================================

/// Query parameters shared by the admin listing endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    /// Render as query pairs, skipping unset fields.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs
    }
}

// =============================================================================
// Reports and analytics
// =============================================================================

/// Sales report over a period.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesReport {
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub order_count: u64,
    #[serde(default)]
    pub average_order_value: Option<Decimal>,
    #[serde(default)]
    pub period: Option<String>,
}

/// One product row in the inventory report.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryRow {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub stock: i32,
}

/// Inventory report.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryReport {
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub out_of_stock: u64,
    #[serde(default)]
    pub low_stock: u64,
    #[serde(default)]
    pub products: Vec<InventoryRow>,
}

/// Absolute counter values for the analytics override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalyticsCounts {
    pub views: u64,
    pub clicks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_stats_decode_with_missing_fields() {
        let stats: OrderStats =
            serde_json::from_str(r#"{"pending": 4, "shipped": 1}"#).expect("decode");
        assert_eq!(stats.pending, 4);
        assert_eq!(stats.cancelled, 0);
    }

    #[test]
    fn test_product_input_skips_unset_fields() {
        let input = ProductInput {
            stock: Some(12),
            ..ProductInput::default()
        };
        let json = serde_json::to_string(&input).expect("serialize");
        assert_eq!(json, r#"{"stock":12}"#);
    }

    #[test]
    fn test_list_query_renders_status() {
        let query = ListQuery {
            status: Some(OrderStatus::Shipped),
            page: Some(3),
            ..ListQuery::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![("status", "shipped".to_string()), ("page", "3".to_string())]
        );
    }

    #[test]
    fn test_bulk_report_decodes_errors() {
        let json = r#"{"created": 10, "failed": 2, "errors": ["row 4: bad price", "row 9: missing title"]}"#;
        let report: BulkUploadReport = serde_json::from_str(json).expect("decode");
        assert_eq!(report.created, 10);
        assert_eq!(report.errors.len(), 2);
    }
}
