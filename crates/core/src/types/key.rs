//! Identity keys for cart and wishlist entries.
//!
//! The backend treats two cart rows as the same logical item only when the
//! product id and both variant selectors match. The wishlist has no variants,
//! so its key is the product id alone. These keys drive optimistic local
//! updates and the merge-on-login reconciliation.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Identity key for a cart line: product plus variant selectors.
///
/// Two lines with the same product but different size or color are distinct
/// entities and must never be collapsed into one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLineKey {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Selected size variant, if the product has sizes.
    pub size: Option<String>,
    /// Selected color variant, if the product has colors.
    pub color: Option<String>,
}

impl CartLineKey {
    /// Create a key from a product id and optional variant selectors.
    #[must_use]
    pub fn new(product_id: ProductId, size: Option<String>, color: Option<String>) -> Self {
        Self {
            product_id,
            size,
            color,
        }
    }

    /// Key for a product with no variant selection.
    #[must_use]
    pub const fn plain(product_id: ProductId) -> Self {
        Self {
            product_id,
            size: None,
            color: None,
        }
    }
}

/// Identity key for a wishlist entry: the product id alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistKey(pub ProductId);

impl From<ProductId> for WishlistKey {
    fn from(id: ProductId) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_selectors_distinguish_lines() {
        let a = CartLineKey::new(ProductId::new(1), Some("M".into()), None);
        let b = CartLineKey::new(ProductId::new(1), Some("L".into()), None);
        let c = CartLineKey::new(ProductId::new(1), Some("M".into()), None);
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_plain_key_has_no_variants() {
        let key = CartLineKey::plain(ProductId::new(9));
        assert_eq!(key.size, None);
        assert_eq!(key.color, None);
    }
}
