//! Wishlist state container.
//!
//! Keyed by product only; the wishlist has no quantities or variants. Unlike
//! the cart, an authenticated add is reverted locally when the server rejects
//! it, so the heart icon never lies about saved state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use tamarind_core::{ProductId, WishlistItemId, WishlistKey};

use crate::api::session::SessionHandle;
use crate::api::types::{ProductSummary, RemoteWishlistItem};
use crate::error::Result;

use super::WishlistBackend;

/// One wishlist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub product: ProductSummary,
    /// Server row id, known only for entries that exist server-side.
    #[serde(default)]
    pub remote_id: Option<WishlistItemId>,
}

impl WishlistEntry {
    /// Identity key of this entry.
    #[must_use]
    pub const fn key(&self) -> WishlistKey {
        WishlistKey(self.product.id)
    }
}

impl From<RemoteWishlistItem> for WishlistEntry {
    fn from(item: RemoteWishlistItem) -> Self {
        Self {
            product: item.product,
            remote_id: Some(item.id),
        }
    }
}

/// Wishlist state container.
#[derive(Clone)]
pub struct WishlistStore {
    backend: Arc<dyn WishlistBackend>,
    session: SessionHandle,
    entries: Arc<RwLock<Vec<WishlistEntry>>>,
}

impl WishlistStore {
    #[must_use]
    pub fn new(backend: Arc<dyn WishlistBackend>, session: SessionHandle) -> Self {
        Self {
            backend,
            session,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed entries from persisted local state, dropping stale remote ids.
    pub async fn load(&self, entries: Vec<WishlistEntry>) {
        let mut guard = self.entries.write().await;
        *guard = entries
            .into_iter()
            .map(|mut entry| {
                entry.remote_id = None;
                entry
            })
            .collect();
    }

    /// Snapshot of the current entries, in insertion order.
    pub async fn snapshot(&self) -> Vec<WishlistEntry> {
        self.entries.read().await.clone()
    }

    /// Whether a product is on the wishlist.
    pub async fn contains(&self, product_id: ProductId) -> bool {
        self.entries
            .read()
            .await
            .iter()
            .any(|e| e.product.id == product_id)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Add a product to the wishlist.
    ///
    /// Adding a product already present is a no-op. The entry appears
    /// locally first; when a session is held and the server rejects the add,
    /// the optimistic entry is removed again and the error surfaced.
    ///
    /// # Errors
    ///
    /// Returns the server error when an authenticated add is rejected.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(&self, product: ProductSummary) -> Result<()> {
        let product_id = product.id;

        {
            let mut entries = self.entries.write().await;
            if entries.iter().any(|e| e.product.id == product_id) {
                debug!("product already wishlisted");
                return Ok(());
            }
            entries.push(WishlistEntry {
                product,
                remote_id: None,
            });
        }

        if !self.session.is_authenticated().await {
            return Ok(());
        }

        match self.backend.add_wishlist_item(product_id).await {
            Ok(mutation) => {
                if let Some(item) = mutation.item {
                    let mut entries = self.entries.write().await;
                    if let Some(entry) = entries.iter_mut().find(|e| e.product.id == product_id) {
                        entry.remote_id = Some(item.id);
                    }
                }
                Ok(())
            }
            Err(e) => {
                let mut entries = self.entries.write().await;
                entries.retain(|entry| entry.product.id != product_id);
                Err(e)
            }
        }
    }

    /// Remove a product from the wishlist.
    ///
    /// The local removal applies immediately. Server-side the row id is used
    /// when known, falling back to removal by product id for entries added
    /// optimistically; failures are logged, not surfaced.
    ///
    /// # Errors
    ///
    /// Never fails for the local mutation.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: ProductId) -> Result<()> {
        let removed = {
            let mut entries = self.entries.write().await;
            let pos = entries.iter().position(|e| e.product.id == product_id);
            pos.map(|p| entries.remove(p))
        };

        let Some(entry) = removed else {
            return Ok(());
        };

        if self.session.is_authenticated().await {
            let result = match entry.remote_id {
                Some(id) => self.backend.remove_wishlist_item(id).await,
                None => self.backend.remove_wishlist_by_product(product_id).await,
            };
            if let Err(e) = result {
                warn!(error = %e, "wishlist removal not mirrored to server");
            }
        }

        Ok(())
    }

    /// Toggle a product's wishlist membership. Returns `true` when the
    /// product ends up wishlisted.
    ///
    /// # Errors
    ///
    /// Returns the server error when an authenticated add is rejected.
    pub async fn toggle(&self, product: ProductSummary) -> Result<bool> {
        if self.contains(product.id).await {
            self.remove(product.id).await?;
            Ok(false)
        } else {
            self.add(product).await?;
            Ok(true)
        }
    }

    /// Replace local entries with the server wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; local entries are left untouched.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<()> {
        let envelope = self.backend.fetch_wishlist().await?;
        let mut entries = self.entries.write().await;
        *entries = envelope.items.into_iter().map(WishlistEntry::from).collect();
        Ok(())
    }

    /// Merge the local (guest) wishlist with the server wishlist after
    /// login. Same shape as the cart merge: the server side is
    /// authoritative, local-only products are pushed best-effort, and a
    /// failed fetch aborts without touching local state. Products present on
    /// both sides simply deduplicate, there is no quantity to resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the server wishlist cannot be fetched.
    #[instrument(skip(self))]
    pub async fn sync_with_backend(&self) -> Result<()> {
        let local = self.snapshot().await;
        let remote = self.backend.fetch_wishlist().await?;

        let mut merged: Vec<WishlistEntry> =
            remote.items.into_iter().map(WishlistEntry::from).collect();

        for entry in local {
            if merged.iter().any(|m| m.key() == entry.key()) {
                continue;
            }

            match self.backend.add_wishlist_item(entry.product.id).await {
                Ok(mutation) => {
                    if let Some(item) = mutation.item {
                        merged.push(WishlistEntry::from(item));
                    } else {
                        let mut pushed = entry;
                        pushed.remote_id = None;
                        merged.push(pushed);
                    }
                }
                Err(e) => {
                    warn!(product_id = %entry.product.id, error = %e, "wishlist entry not pushed, kept locally");
                    let mut kept = entry;
                    kept.remote_id = None;
                    merged.push(kept);
                }
            }
        }

        *self.entries.write().await = merged;
        Ok(())
    }

    /// Drop local state on logout. The server copy is not modified.
    pub async fn clear_on_logout(&self) {
        self.entries.write().await.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

    use async_trait::async_trait;

    use crate::api::session::SessionHandle;
    use crate::api::types::{WishlistEnvelope, WishlistMutation};
    use crate::error::ApiError;
    use crate::stores::cart::tests::{logged_in, product};

    use super::*;

    #[derive(Default)]
    struct FakeWishlistBackend {
        rows: Mutex<BTreeMap<i32, RemoteWishlistItem>>,
        next_id: AtomicI32,
        fail_fetch: AtomicBool,
        fail_add: AtomicBool,
    }

    impl FakeWishlistBackend {
        fn seed(&self, product: ProductSummary) {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.rows.lock().expect("lock").insert(
                id,
                RemoteWishlistItem {
                    id: WishlistItemId::new(id),
                    product,
                },
            );
        }

        fn has_product(&self, product_id: i32) -> bool {
            self.rows
                .lock()
                .expect("lock")
                .values()
                .any(|r| r.product.id == ProductId::new(product_id))
        }

        fn row_count(&self) -> usize {
            self.rows.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl WishlistBackend for FakeWishlistBackend {
        async fn fetch_wishlist(&self) -> Result<WishlistEnvelope> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "fetch failed".into(),
                });
            }
            Ok(WishlistEnvelope {
                items: self.rows.lock().expect("lock").values().cloned().collect(),
            })
        }

        async fn add_wishlist_item(&self, product_id: ProductId) -> Result<WishlistMutation> {
            if self.fail_add.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "add failed".into(),
                });
            }

            let mut rows = self.rows.lock().expect("lock");
            if let Some(row) = rows.values().find(|r| r.product.id == product_id) {
                return Ok(WishlistMutation {
                    message: Some("already in wishlist".into()),
                    item: Some(row.clone()),
                });
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let row = RemoteWishlistItem {
                id: WishlistItemId::new(id),
                product: product(product_id.as_i32(), "seeded", 1000),
            };
            rows.insert(id, row.clone());
            Ok(WishlistMutation {
                message: None,
                item: Some(row),
            })
        }

        async fn remove_wishlist_item(&self, id: WishlistItemId) -> Result<()> {
            self.rows
                .lock()
                .expect("lock")
                .remove(&id.as_i32())
                .map(|_| ())
                .ok_or_else(|| ApiError::NotFound(format!("wishlist item {id}")))
        }

        async fn remove_wishlist_by_product(&self, product_id: ProductId) -> Result<()> {
            let mut rows = self.rows.lock().expect("lock");
            let before = rows.len();
            rows.retain(|_, r| r.product.id != product_id);
            if rows.len() == before {
                return Err(ApiError::NotFound(format!("product {product_id}")));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_add_is_idempotent_per_product() {
        let store = WishlistStore::new(
            Arc::new(FakeWishlistBackend::default()),
            SessionHandle::new(),
        );

        store.add(product(1, "Shirt", 3999)).await.expect("add");
        store.add(product(1, "Shirt", 3999)).await.expect("add");

        assert_eq!(store.len().await, 1);
        assert!(store.contains(ProductId::new(1)).await);
    }

    #[tokio::test]
    async fn test_authenticated_add_reverts_on_server_failure() {
        let backend = Arc::new(FakeWishlistBackend::default());
        backend.fail_add.store(true, Ordering::SeqCst);

        let store = WishlistStore::new(backend, logged_in().await);
        let result = store.add(product(1, "Shirt", 3999)).await;

        assert!(result.is_err());
        assert!(
            !store.contains(ProductId::new(1)).await,
            "optimistic entry reverted"
        );
    }

    #[tokio::test]
    async fn test_toggle_roundtrip() {
        let backend = Arc::new(FakeWishlistBackend::default());
        let store = WishlistStore::new(backend.clone(), logged_in().await);
        let p = product(3, "Belt", 1500);

        assert!(store.toggle(p.clone()).await.expect("toggle on"));
        assert!(backend.has_product(3));

        assert!(!store.toggle(p).await.expect("toggle off"));
        assert!(!backend.has_product(3));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_merge_dedupes_and_pushes_local_only() {
        let backend = Arc::new(FakeWishlistBackend::default());
        backend.seed(product(1, "Shirt", 3999));

        let store = WishlistStore::new(backend.clone(), logged_in().await);
        store.load(vec![
            WishlistEntry {
                product: product(1, "Shirt", 3999),
                remote_id: None,
            },
            WishlistEntry {
                product: product(2, "Scarf", 1250),
                remote_id: None,
            },
        ])
        .await;

        store.sync_with_backend().await.expect("sync");

        assert_eq!(store.len().await, 2, "collision deduplicated");
        assert!(backend.has_product(2), "local-only product pushed");
        assert_eq!(backend.row_count(), 2);
    }

    #[tokio::test]
    async fn test_merge_aborts_on_fetch_failure() {
        let backend = Arc::new(FakeWishlistBackend::default());
        backend.fail_fetch.store(true, Ordering::SeqCst);

        let store = WishlistStore::new(backend, logged_in().await);
        store
            .load(vec![WishlistEntry {
                product: product(1, "Shirt", 3999),
                remote_id: None,
            }])
            .await;

        assert!(store.sync_with_backend().await.is_err());
        assert_eq!(store.len().await, 1, "local wishlist untouched");
    }

    #[tokio::test]
    async fn test_remove_falls_back_to_product_id() {
        let backend = Arc::new(FakeWishlistBackend::default());
        backend.seed(product(5, "Hat", 900));

        let store = WishlistStore::new(backend.clone(), logged_in().await);
        // Local entry without a remote id, as after an optimistic add.
        store
            .load(vec![WishlistEntry {
                product: product(5, "Hat", 900),
                remote_id: None,
            }])
            .await;

        store.remove(ProductId::new(5)).await.expect("remove");

        assert!(!backend.has_product(5));
        assert!(store.is_empty().await);
    }
}
