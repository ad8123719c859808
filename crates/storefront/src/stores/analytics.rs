//! Storefront analytics counters.
//!
//! Recording a view or click is fire-and-forget: failures are logged and the
//! local counter is bumped optimistically so the UI never blocks on
//! analytics.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::api::types::AnalyticsCounts;
use crate::error::Result;

/// Analytics state container.
#[derive(Clone)]
pub struct AnalyticsStore {
    api: ApiClient,
    counts: Arc<RwLock<AnalyticsCounts>>,
}

impl AnalyticsStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            counts: Arc::new(RwLock::new(AnalyticsCounts::default())),
        }
    }

    /// Current counters as last observed.
    pub async fn counts(&self) -> AnalyticsCounts {
        *self.counts.read().await
    }

    /// Reload counters from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; counters are left untouched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let counts = self.api.fetch_analytics().await?;
        *self.counts.write().await = counts;
        Ok(())
    }

    /// Record a page view. Never fails; a rejected request only logs.
    #[instrument(skip(self))]
    pub async fn record_view(&self) {
        self.counts.write().await.views += 1;
        if let Err(e) = self.api.record_view().await {
            debug!(error = %e, "view not recorded server-side");
        }
    }

    /// Record a click. Never fails; a rejected request only logs.
    #[instrument(skip(self))]
    pub async fn record_click(&self) {
        self.counts.write().await.clicks += 1;
        if let Err(e) = self.api.record_click().await {
            debug!(error = %e, "click not recorded server-side");
        }
    }
}
