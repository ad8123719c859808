//! Cache types for catalogue responses.

use std::sync::Arc;

use crate::api::types::{ProductPage, ProductSummary, Section};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Arc<ProductSummary>),
    Page(Arc<ProductPage>),
    Sections(Arc<Vec<Section>>),
}
