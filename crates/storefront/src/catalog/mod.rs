//! Catalogue reads with response caching.
//!
//! Products and sections change rarely from a customer's point of view, so
//! reads are cached using `moka` (5-minute TTL). Filtered and search queries
//! bypass the cache entirely; cart, wishlist, and order reads are never
//! cached because they are per-user mutable state.

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use tamarind_core::ProductId;

use crate::api::ApiClient;
use crate::api::types::{ProductPage, ProductQuery, ProductSummary, Section};
use crate::error::Result;

use cache::CacheValue;

/// Catalogue client wrapping the API client with a read cache.
///
/// Cached entries expire after 5 minutes; an explicit
/// [`CatalogClient::invalidate_all`] covers the rare case where the caller
/// knows the catalogue just changed (e.g. after an admin edit in the same
/// process).
#[derive(Clone)]
pub struct CatalogClient {
    api: ApiClient,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { api, cache }
    }

    /// List products. Unfiltered listings are cached per page; search and
    /// section filters always hit the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Arc<ProductPage>> {
        if query.is_filtered() {
            return Ok(Arc::new(self.api.list_products(query).await?));
        }

        let cache_key = format!(
            "products:{}:{}",
            query.page.unwrap_or(1),
            query.per_page.map(|n| n.to_string()).unwrap_or_default()
        );

        if let Some(CacheValue::Page(page)) = self.cache.get(&cache_key).await {
            debug!("cache hit for products");
            return Ok(page);
        }

        let page = Arc::new(self.api.list_products(query).await?);
        self.cache
            .insert(cache_key, CacheValue::Page(page.clone()))
            .await;
        Ok(page)
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown products.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Arc<ProductSummary>> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(product);
        }

        let product = Arc::new(self.api.get_product(id).await?);
        self.cache
            .insert(cache_key, CacheValue::Product(product.clone()))
            .await;
        Ok(product)
    }

    /// Fetch one product by slug.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown products.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Arc<ProductSummary>> {
        let cache_key = format!("product-slug:{slug}");

        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(product);
        }

        let product = Arc::new(self.api.get_product_by_slug(slug).await?);
        self.cache
            .insert(cache_key, CacheValue::Product(product.clone()))
            .await;
        Ok(product)
    }

    /// List products in a section by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query), fields(category = %category_slug))]
    pub async fn products_by_category(
        &self,
        category_slug: &str,
        query: &ProductQuery,
    ) -> Result<Arc<ProductPage>> {
        if query.is_filtered() {
            return Ok(Arc::new(
                self.api.list_products_by_category(category_slug, query).await?,
            ));
        }

        let cache_key = format!("category:{category_slug}:{}", query.page.unwrap_or(1));

        if let Some(CacheValue::Page(page)) = self.cache.get(&cache_key).await {
            debug!("cache hit for category listing");
            return Ok(page);
        }

        let page = Arc::new(self.api.list_products_by_category(category_slug, query).await?);
        self.cache
            .insert(cache_key, CacheValue::Page(page.clone()))
            .await;
        Ok(page)
    }

    /// Featured products for the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn featured(&self, limit: u32) -> Result<Arc<ProductPage>> {
        let cache_key = format!("featured:{limit}");

        if let Some(CacheValue::Page(page)) = self.cache.get(&cache_key).await {
            debug!("cache hit for featured products");
            return Ok(page);
        }

        let page = Arc::new(self.api.featured_products(limit).await?);
        self.cache
            .insert(cache_key, CacheValue::Page(page.clone()))
            .await;
        Ok(page)
    }

    /// Newest products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn new_arrivals(&self, limit: u32) -> Result<Arc<ProductPage>> {
        let cache_key = format!("new-arrivals:{limit}");

        if let Some(CacheValue::Page(page)) = self.cache.get(&cache_key).await {
            debug!("cache hit for new arrivals");
            return Ok(page);
        }

        let page = Arc::new(self.api.new_arrivals(limit).await?);
        self.cache
            .insert(cache_key, CacheValue::Page(page.clone()))
            .await;
        Ok(page)
    }

    /// List storefront sections.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn sections(&self) -> Result<Arc<Vec<Section>>> {
        let cache_key = "sections".to_string();

        if let Some(CacheValue::Sections(sections)) = self.cache.get(&cache_key).await {
            debug!("cache hit for sections");
            return Ok(sections);
        }

        let sections = Arc::new(self.api.list_sections().await?);
        self.cache
            .insert(cache_key, CacheValue::Sections(sections.clone()))
            .await;
        Ok(sections)
    }

    /// Invalidate one product's cached entries (id key only; slug entries
    /// expire on their own).
    pub async fn invalidate_product(&self, id: ProductId) {
        self.cache.invalidate(&format!("product:{id}")).await;
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
