//! REST endpoint paths, relative to the configured API root.
//!
//! Centralized so the client methods and tests agree on the wire surface.

use tamarind_core::{AddressId, CartItemId, OrderId, ProductId, WishlistItemId};

// Authentication
pub const AUTH_LOGIN: &str = "auth/login";
pub const AUTH_REGISTER: &str = "auth/register";
pub const AUTH_LOGOUT: &str = "auth/logout";
pub const AUTH_REFRESH: &str = "auth/refresh";
pub const AUTH_PROFILE: &str = "auth/me";
pub const AUTH_UPDATE_PROFILE: &str = "auth/profile";
pub const AUTH_CHANGE_PASSWORD: &str = "auth/change-password";

// Cart
pub const CART: &str = "cart";
pub const CART_CLEAR: &str = "cart/clear";

#[must_use]
pub fn cart_item(id: CartItemId) -> String {
    format!("cart/{id}")
}

// Wishlist
pub const WISHLIST: &str = "wishlist";

#[must_use]
pub fn wishlist_item(id: WishlistItemId) -> String {
    format!("wishlist/{id}")
}

#[must_use]
pub fn wishlist_by_product(id: ProductId) -> String {
    format!("wishlist/product/{id}")
}

#[must_use]
pub fn wishlist_check(id: ProductId) -> String {
    format!("wishlist/check/{id}")
}

// Addresses
pub const ADDRESSES: &str = "addresses";

#[must_use]
pub fn address(id: AddressId) -> String {
    format!("addresses/{id}")
}

#[must_use]
pub fn address_set_default(id: AddressId) -> String {
    format!("addresses/{id}/set-default")
}

// Orders
pub const ORDERS: &str = "orders";

#[must_use]
pub fn order(id: OrderId) -> String {
    format!("orders/{id}")
}

#[must_use]
pub fn order_cancel(id: OrderId) -> String {
    format!("orders/{id}/cancel")
}

#[must_use]
pub fn order_receipt(id: OrderId) -> String {
    format!("orders/{id}/receipt")
}

// Products and sections (read-only for customers)
pub const PRODUCTS: &str = "products";
pub const PRODUCTS_FEATURED: &str = "products/featured";
pub const PRODUCTS_NEW_ARRIVALS: &str = "products/new-arrivals";
pub const SECTIONS: &str = "sections";

#[must_use]
pub fn product(id: ProductId) -> String {
    format!("products/{id}")
}

#[must_use]
pub fn product_by_slug(slug: &str) -> String {
    format!("products/slug/{slug}")
}

#[must_use]
pub fn products_by_category(category_slug: &str) -> String {
    format!("products/category/{category_slug}")
}

// Analytics
pub const ANALYTICS: &str = "analytics";
pub const ANALYTICS_VIEW: &str = "analytics/view";
pub const ANALYTICS_CLICK: &str = "analytics/click";

// Utility
pub const HEALTH: &str = "health";
