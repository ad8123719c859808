//! Wire types for the storefront REST API.
//!
//! Response envelopes mirror the backend's JSON shapes (`{"items": [...]}`,
//! `{"order": {...}}`). Unknown fields are ignored so additive backend
//! changes do not break the client.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tamarind_core::{
    AddressId, CartItemId, CartLineKey, Email, OrderId, OrderStatus, Price, ProductId, SectionId,
    UserId, UserRole, WishlistItemId,
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

/// Customer account as served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
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
    pub created_at: Option<NaiveDateTime>,
}

const fn default_true() -> bool {
    true
}

/// Response from login and registration.
///
/// Registration may omit tokens when the deployment requires email
/// verification before the first session.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from the token refresh endpoint.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Login payload.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Profile update payload; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Password change payload.
#[derive(Debug, Serialize)]
pub struct ChangePassword<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

// =============================================================================
// Catalogue
// =============================================================================

/// Product as listed and referenced from cart/wishlist/order lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub is_on_sale: bool,
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
}

/// Storefront section (category).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
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

/// Paginated product listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<ProductSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub current_page: Option<u32>,
    /// Present on category listings.
    #[serde(default)]
    pub section: Option<Section>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: ProductSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SectionsEnvelope {
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Query parameters for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub section: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ProductQuery {
    /// Render as query pairs, skipping unset fields.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(section) = &self.section {
            pairs.push(("section", section.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs
    }

    /// Whether this query filters or searches (uncacheable).
    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        self.search.is_some() || self.section.is_some()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Server-side cart row.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCartItem {
    pub id: CartItemId,
    pub product: ProductSummary,
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl RemoteCartItem {
    /// Identity key of this row.
    #[must_use]
    pub fn key(&self) -> CartLineKey {
        CartLineKey::new(self.product.id, self.size.clone(), self.color.clone())
    }
}

/// `GET /cart` response.
#[derive(Debug, Deserialize)]
pub struct CartEnvelope {
    #[serde(default)]
    pub items: Vec<RemoteCartItem>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

/// Payload for creating a cart row.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemCreate {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload for updating a cart row.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemUpdate {
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Cart mutation response; the backend echoes the affected row.
#[derive(Debug, Deserialize)]
pub struct CartMutation {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub item: Option<RemoteCartItem>,
}

// =============================================================================
// Wishlist
// =============================================================================

/// Server-side wishlist row.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteWishlistItem {
    pub id: WishlistItemId,
    pub product: ProductSummary,
}

/// `GET /wishlist` response.
#[derive(Debug, Deserialize)]
pub struct WishlistEnvelope {
    #[serde(default)]
    pub items: Vec<RemoteWishlistItem>,
}

/// Wishlist mutation response.
#[derive(Debug, Deserialize)]
pub struct WishlistMutation {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub item: Option<RemoteWishlistItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WishlistCheck {
    #[serde(default)]
    pub in_wishlist: bool,
}

// =============================================================================
// Addresses
// =============================================================================

/// Delivery address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Address create/update payload.
#[derive(Debug, Clone, Serialize)]
pub struct AddressInput {
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressesEnvelope {
    #[serde(default)]
    pub addresses: Vec<Address>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressEnvelope {
    pub address: Address,
}

// =============================================================================
// Orders
// =============================================================================

/// Order line as served in order details.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product: Option<ProductSummary>,
    pub quantity: u32,
    pub price: Price,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Customer order.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    #[serde(default)]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    pub total_amount: Price,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersEnvelope {
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderEnvelope {
    pub order: Order,
}

/// Checkout line item.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Checkout payload.
#[derive(Debug, Clone, Serialize)]
pub struct OrderCreate {
    pub address_id: AddressId,
    pub items: Vec<OrderLineInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

// =============================================================================
// Analytics
// =============================================================================

/// Public storefront counters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AnalyticsCounts {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub clicks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_envelope_decodes_backend_shape() {
        let json = r#"{
            "items": [{
                "id": 11,
                "user_id": 3,
                "product_id": 5,
                "quantity": 2,
                "size": "M",
                "color": null,
                "product": {
                    "id": 5, "title": "Linen Shirt", "slug": "linen-shirt",
                    "price": "39.99", "sizes": ["S", "M", "L"]
                }
            }],
            "subtotal": 79.98,
            "total": 79.98
        }"#;

        let cart: CartEnvelope = serde_json::from_str(json).expect("decode");
        let item = cart.items.first().expect("one item");
        assert_eq!(item.id, CartItemId::new(11));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.key().size.as_deref(), Some("M"));
        assert_eq!(item.product.title, "Linen Shirt");
    }

    #[test]
    fn test_auth_response_without_tokens() {
        let json = r#"{
            "user": {"id": 1, "name": "Asha", "email": "asha@example.com"},
            "message": "Please verify your email"
        }"#;
        let resp: AuthResponse = serde_json::from_str(json).expect("decode");
        assert!(resp.access_token.is_none());
        assert_eq!(resp.user.role, UserRole::Customer);
        assert!(resp.user.is_active);
    }

    #[test]
    fn test_product_query_pairs_skip_unset() {
        let query = ProductQuery {
            search: Some("shirt".into()),
            page: Some(2),
            ..ProductQuery::default()
        };
        let pairs = query.to_pairs();
        assert_eq!(
            pairs,
            vec![("search", "shirt".to_string()), ("page", "2".to_string())]
        );
        assert!(query.is_filtered());
    }

    #[test]
    fn test_error_body_prefers_error_field() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "Product not found"}"#).expect("decode");
        assert_eq!(body.into_message().as_deref(), Some("Product not found"));
    }
}
