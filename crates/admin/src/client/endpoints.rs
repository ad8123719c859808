//! Admin endpoint paths, relative to the configured admin API root.

use tamarind_core::{OrderId, ProductId, SectionId, UserId};

// Authentication
pub const AUTH_LOGIN: &str = "auth/login";
pub const AUTH_LOGOUT: &str = "auth/logout";
pub const AUTH_REFRESH: &str = "auth/refresh";
pub const AUTH_PROFILE: &str = "auth/me";

// Dashboard
pub const STATS: &str = "stats";
pub const ORDER_STATS: &str = "stats/orders";

// Users
pub const USERS: &str = "users";

#[must_use]
pub fn user(id: UserId) -> String {
    format!("users/{id}")
}

#[must_use]
pub fn user_toggle_status(id: UserId) -> String {
    format!("users/{id}/toggle-status")
}

// Products
pub const PRODUCTS: &str = "products";
pub const PRODUCTS_BULK_UPLOAD: &str = "products/bulk-upload";

#[must_use]
pub fn product(id: ProductId) -> String {
    format!("products/{id}")
}

#[must_use]
pub fn product_toggle_status(id: ProductId) -> String {
    format!("products/{id}/toggle-status")
}

// Sections
pub const SECTIONS: &str = "sections";
pub const SECTIONS_REORDER: &str = "sections/reorder";

#[must_use]
pub fn section(id: SectionId) -> String {
    format!("sections/{id}")
}

#[must_use]
pub fn section_toggle_status(id: SectionId) -> String {
    format!("sections/{id}/toggle-status")
}

// Orders
pub const ORDERS: &str = "orders";

#[must_use]
pub fn order(id: OrderId) -> String {
    format!("orders/{id}")
}

#[must_use]
pub fn order_status(id: OrderId) -> String {
    format!("orders/{id}/status")
}

// Uploads
pub const UPLOAD_IMAGE: &str = "uploads/image";
pub const UPLOAD_IMAGES: &str = "uploads/images";

// Reports
pub const REPORT_SALES: &str = "reports/sales";
pub const REPORT_INVENTORY: &str = "reports/inventory";

// Analytics override
pub const ANALYTICS: &str = "analytics";
