//! Shopping cart state container.
//!
//! The cart is fully usable while anonymous: mutations apply to local state
//! immediately and are mirrored to the backend only when a session is held.
//! On login the local cart is merged with the server cart (see
//! [`CartStore::sync_with_backend`]); on logout local state is dropped
//! without touching the server copy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use tamarind_core::{CartItemId, CartLineKey, Price};

use crate::api::session::SessionHandle;
use crate::api::types::{CartItemCreate, CartItemUpdate, ProductSummary, RemoteCartItem};
use crate::error::Result;

use super::CartBackend;

/// One cart line, keyed by product and variant selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product: ProductSummary,
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Server row id, known only for lines that exist server-side.
    #[serde(default)]
    pub remote_id: Option<CartItemId>,
}

impl CartLine {
    /// Identity key of this line. Two lines with the same product but
    /// different size or color are distinct.
    #[must_use]
    pub fn key(&self) -> CartLineKey {
        CartLineKey::new(self.product.id, self.size.clone(), self.color.clone())
    }

    /// Line total (unit price times quantity).
    #[must_use]
    pub fn total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

impl From<RemoteCartItem> for CartLine {
    fn from(item: RemoteCartItem) -> Self {
        Self {
            product: item.product,
            quantity: item.quantity,
            size: item.size,
            color: item.color,
            remote_id: Some(item.id),
        }
    }
}

/// Cart state container.
///
/// Cloned handles share the same lines; one instance per session.
#[derive(Clone)]
pub struct CartStore {
    backend: Arc<dyn CartBackend>,
    session: SessionHandle,
    lines: Arc<RwLock<Vec<CartLine>>>,
}

impl CartStore {
    #[must_use]
    pub fn new(backend: Arc<dyn CartBackend>, session: SessionHandle) -> Self {
        Self {
            backend,
            session,
            lines: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed lines from persisted local state. Remote ids are dropped: they
    /// are only meaningful within the session that observed them.
    pub async fn load(&self, lines: Vec<CartLine>) {
        let mut guard = self.lines.write().await;
        *guard = lines
            .into_iter()
            .map(|mut line| {
                line.remote_id = None;
                line
            })
            .collect();
    }

    /// Snapshot of the current lines, in insertion order.
    pub async fn snapshot(&self) -> Vec<CartLine> {
        self.lines.read().await.clone()
    }

    /// Number of units across all lines.
    pub async fn item_count(&self) -> u32 {
        self.lines.read().await.iter().map(|l| l.quantity).sum()
    }

    /// Sum of line totals.
    pub async fn subtotal(&self) -> Price {
        Price::sum(self.lines.read().await.iter().map(CartLine::total))
    }

    /// Add a product to the cart, or increase the quantity of an existing
    /// line with the same variant selection.
    ///
    /// The local mutation applies immediately. When a session is held the
    /// change is mirrored to the backend; a server failure is logged and the
    /// local line stands until the next sync.
    ///
    /// # Errors
    ///
    /// Never fails for the local mutation; reserved for future validation.
    #[instrument(skip(self, product), fields(product_id = %product.id, quantity))]
    pub async fn add_item(
        &self,
        product: ProductSummary,
        quantity: u32,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<()> {
        let key = CartLineKey::new(product.id, size.clone(), color.clone());

        {
            let mut lines = self.lines.write().await;
            if let Some(line) = lines.iter_mut().find(|l| l.key() == key) {
                line.quantity += quantity;
            } else {
                lines.push(CartLine {
                    product,
                    quantity,
                    size: size.clone(),
                    color: color.clone(),
                    remote_id: None,
                });
            }
        }

        if self.session.is_authenticated().await {
            let create = CartItemCreate {
                product_id: key.product_id,
                quantity,
                size,
                color,
            };
            match self.backend.add_cart_item(&create).await {
                Ok(mutation) => {
                    if let Some(item) = mutation.item {
                        self.apply_remote_row(&key, item).await;
                    }
                }
                Err(e) => warn!(error = %e, "cart add not mirrored to server"),
            }
        }

        Ok(())
    }

    /// Set a line's quantity. Zero removes the line, identically to
    /// [`Self::remove_item`].
    ///
    /// # Errors
    ///
    /// Never fails for the local mutation; server failures are logged.
    #[instrument(skip(self), fields(product_id = %key.product_id, quantity))]
    pub async fn update_quantity(&self, key: &CartLineKey, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return self.remove_item(key).await;
        }

        let remote_id = {
            let mut lines = self.lines.write().await;
            let Some(line) = lines.iter_mut().find(|l| l.key() == *key) else {
                debug!("quantity update for a line not in the cart, ignored");
                return Ok(());
            };
            line.quantity = quantity;
            line.remote_id
        };

        if self.session.is_authenticated().await
            && let Some(id) = remote_id
        {
            let update = CartItemUpdate {
                quantity,
                size: key.size.clone(),
                color: key.color.clone(),
            };
            if let Err(e) = self.backend.update_cart_item(id, &update).await {
                warn!(error = %e, "cart update not mirrored to server");
            }
        }

        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Never fails for the local mutation; server failures are logged.
    #[instrument(skip(self), fields(product_id = %key.product_id))]
    pub async fn remove_item(&self, key: &CartLineKey) -> Result<()> {
        let remote_id = {
            let mut lines = self.lines.write().await;
            let Some(pos) = lines.iter().position(|l| l.key() == *key) else {
                return Ok(());
            };
            lines.remove(pos).remote_id
        };

        if self.session.is_authenticated().await
            && let Some(id) = remote_id
            && let Err(e) = self.backend.remove_cart_item(id).await
        {
            warn!(error = %e, "cart removal not mirrored to server");
        }

        Ok(())
    }

    /// Empty the cart locally and, when a session is held, server-side.
    ///
    /// # Errors
    ///
    /// Never fails for the local mutation; server failures are logged.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        self.lines.write().await.clear();

        if self.session.is_authenticated().await
            && let Err(e) = self.backend.clear_cart().await
        {
            warn!(error = %e, "cart clear not mirrored to server");
        }

        Ok(())
    }

    /// Replace local lines with the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; local lines are left untouched.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<()> {
        let envelope = self.backend.fetch_cart().await?;
        let mut lines = self.lines.write().await;
        *lines = envelope.items.into_iter().map(CartLine::from).collect();
        Ok(())
    }

    /// Merge the local (guest) cart with the server cart after login.
    ///
    /// The server copy is authoritative: for any identity key present on
    /// both sides the server row wins and the local quantity is discarded.
    /// Local-only lines are pushed to the server best-effort; a line whose
    /// push fails stays local and is retried on the next sync.
    ///
    /// The merge is idempotent: running it again when no local-only lines
    /// remain reproduces the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cart cannot be fetched; local state is
    /// left untouched in that case.
    #[instrument(skip(self))]
    pub async fn sync_with_backend(&self) -> Result<()> {
        let local = self.snapshot().await;
        let remote = self.backend.fetch_cart().await?;

        let mut merged: Vec<CartLine> = remote.items.into_iter().map(CartLine::from).collect();

        for line in local {
            let key = line.key();
            if merged.iter().any(|m| m.key() == key) {
                debug!(product_id = %key.product_id, "server row wins over local line");
                continue;
            }

            let create = CartItemCreate {
                product_id: key.product_id,
                quantity: line.quantity,
                size: line.size.clone(),
                color: line.color.clone(),
            };
            match self.backend.add_cart_item(&create).await {
                Ok(mutation) => {
                    if let Some(item) = mutation.item {
                        merged.push(CartLine::from(item));
                    } else {
                        let mut pushed = line;
                        pushed.remote_id = None;
                        merged.push(pushed);
                    }
                }
                Err(e) => {
                    warn!(product_id = %key.product_id, error = %e, "cart line not pushed, kept locally");
                    let mut kept = line;
                    kept.remote_id = None;
                    merged.push(kept);
                }
            }
        }

        *self.lines.write().await = merged;
        Ok(())
    }

    /// Drop local state on logout. The server copy is not modified.
    pub async fn clear_on_logout(&self) {
        self.lines.write().await.clear();
    }

    /// Record the server row for a line after a mirrored mutation.
    async fn apply_remote_row(&self, key: &CartLineKey, item: RemoteCartItem) {
        let mut lines = self.lines.write().await;
        if let Some(line) = lines.iter_mut().find(|l| l.key() == *key) {
            line.remote_id = Some(item.id);
            // The backend collapses duplicate keys by summing, so its
            // quantity is the authoritative one.
            line.quantity = item.quantity;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use tamarind_core::ProductId;

    use crate::api::session::SessionTokens;
    use crate::api::types::{CartEnvelope, CartMutation};
    use crate::error::ApiError;

    use super::*;

    pub(crate) fn product(id: i32, title: &str, price_cents: i64) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            sku: None,
            price: Price::new(Decimal::new(price_cents, 2)).expect("valid price"),
            original_price: None,
            is_on_sale: false,
            stock: 10,
            section_id: None,
            images: Vec::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
            is_active: true,
            description: None,
        }
    }

    pub(crate) async fn logged_in() -> SessionHandle {
        let session = SessionHandle::new();
        session
            .set(SessionTokens::new("access".into(), "refresh".into()))
            .await;
        session
    }

    /// In-memory cart backend that mimics the server's collapse-by-key rule.
    #[derive(Default)]
    pub(crate) struct FakeCartBackend {
        rows: Mutex<BTreeMap<i32, RemoteCartItem>>,
        next_id: AtomicI32,
        pub fail_fetch: AtomicBool,
        pub fail_add: AtomicBool,
    }

    impl FakeCartBackend {
        pub fn seed(&self, product: ProductSummary, quantity: u32, size: Option<&str>) {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.rows.lock().expect("lock").insert(
                id,
                RemoteCartItem {
                    id: CartItemId::new(id),
                    product,
                    quantity,
                    size: size.map(str::to_string),
                    color: None,
                },
            );
        }

        pub fn row_count(&self) -> usize {
            self.rows.lock().expect("lock").len()
        }

        pub fn quantity_for(&self, product_id: i32, size: Option<&str>) -> Option<u32> {
            self.rows
                .lock()
                .expect("lock")
                .values()
                .find(|r| r.product.id == ProductId::new(product_id) && r.size.as_deref() == size)
                .map(|r| r.quantity)
        }
    }

    #[async_trait]
    impl CartBackend for FakeCartBackend {
        async fn fetch_cart(&self) -> Result<CartEnvelope> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "fetch failed".into(),
                });
            }
            Ok(CartEnvelope {
                items: self.rows.lock().expect("lock").values().cloned().collect(),
                subtotal: None,
                total: None,
            })
        }

        async fn add_cart_item(&self, create: &CartItemCreate) -> Result<CartMutation> {
            if self.fail_add.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "add failed".into(),
                });
            }

            let mut rows = self.rows.lock().expect("lock");
            let key = CartLineKey::new(create.product_id, create.size.clone(), create.color.clone());

            if let Some(row) = rows.values_mut().find(|r| r.key() == key) {
                row.quantity += create.quantity;
                return Ok(CartMutation {
                    message: None,
                    item: Some(row.clone()),
                });
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let row = RemoteCartItem {
                id: CartItemId::new(id),
                product: product(create.product_id.as_i32(), "seeded", 1000),
                quantity: create.quantity,
                size: create.size.clone(),
                color: create.color.clone(),
            };
            rows.insert(id, row.clone());
            Ok(CartMutation {
                message: None,
                item: Some(row),
            })
        }

        async fn update_cart_item(
            &self,
            id: CartItemId,
            update: &CartItemUpdate,
        ) -> Result<CartMutation> {
            let mut rows = self.rows.lock().expect("lock");
            let row = rows
                .get_mut(&id.as_i32())
                .ok_or_else(|| ApiError::NotFound(format!("cart item {id}")))?;
            row.quantity = update.quantity;
            Ok(CartMutation {
                message: None,
                item: Some(row.clone()),
            })
        }

        async fn remove_cart_item(&self, id: CartItemId) -> Result<()> {
            self.rows
                .lock()
                .expect("lock")
                .remove(&id.as_i32())
                .map(|_| ())
                .ok_or_else(|| ApiError::NotFound(format!("cart item {id}")))
        }

        async fn clear_cart(&self) -> Result<()> {
            self.rows.lock().expect("lock").clear();
            Ok(())
        }
    }

    fn guest_store(backend: Arc<FakeCartBackend>) -> CartStore {
        CartStore::new(backend, SessionHandle::new())
    }

    #[tokio::test]
    async fn test_add_upserts_by_variant_key() {
        let store = guest_store(Arc::new(FakeCartBackend::default()));

        store
            .add_item(product(1, "Shirt", 3999), 1, Some("M".into()), None)
            .await
            .expect("add");
        store
            .add_item(product(1, "Shirt", 3999), 2, Some("M".into()), None)
            .await
            .expect("add");
        store
            .add_item(product(1, "Shirt", 3999), 1, Some("L".into()), None)
            .await
            .expect("add");

        let lines = store.snapshot().await;
        assert_eq!(lines.len(), 2, "same product, different sizes stay distinct");
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(store.item_count().await, 4);
    }

    #[tokio::test]
    async fn test_subtotal_sums_line_totals() {
        let store = guest_store(Arc::new(FakeCartBackend::default()));
        store
            .add_item(product(1, "Shirt", 3999), 2, None, None)
            .await
            .expect("add");
        store
            .add_item(product(2, "Scarf", 1250), 1, None, None)
            .await
            .expect("add");

        assert_eq!(store.subtotal().await.to_string(), "92.48");
    }

    #[tokio::test]
    async fn test_quantity_zero_removes_line() {
        let store = guest_store(Arc::new(FakeCartBackend::default()));
        let p = product(1, "Shirt", 3999);
        store
            .add_item(p.clone(), 2, None, None)
            .await
            .expect("add");

        let key = CartLineKey::plain(p.id);
        store.update_quantity(&key, 0).await.expect("update");

        assert!(store.snapshot().await.is_empty());
        assert_eq!(store.item_count().await, 0);
    }

    #[tokio::test]
    async fn test_authenticated_add_records_remote_id() {
        let backend = Arc::new(FakeCartBackend::default());
        let store = CartStore::new(backend.clone(), logged_in().await);

        store
            .add_item(product(7, "Boots", 8999), 1, None, None)
            .await
            .expect("add");

        let lines = store.snapshot().await;
        assert!(lines[0].remote_id.is_some());
        assert_eq!(backend.row_count(), 1);
    }

    #[tokio::test]
    async fn test_merge_server_wins_on_collision() {
        let backend = Arc::new(FakeCartBackend::default());
        // Server: A size M qty 5, product C.
        backend.seed(product(1, "Shirt", 3999), 5, Some("M"));
        backend.seed(product(3, "Belt", 1500), 1, None);

        let store = CartStore::new(backend.clone(), logged_in().await);
        // Local guest cart: A size M qty 2 (collides), A size L (new), B (new).
        store.load(vec![
            CartLine {
                product: product(1, "Shirt", 3999),
                quantity: 2,
                size: Some("M".into()),
                color: None,
                remote_id: None,
            },
            CartLine {
                product: product(1, "Shirt", 3999),
                quantity: 1,
                size: Some("L".into()),
                color: None,
                remote_id: None,
            },
            CartLine {
                product: product(2, "Scarf", 1250),
                quantity: 3,
                size: None,
                color: None,
                remote_id: None,
            },
        ])
        .await;

        store.sync_with_backend().await.expect("sync");

        let lines = store.snapshot().await;
        assert_eq!(lines.len(), 4);

        // Colliding key: server quantity kept, local 2 discarded.
        assert_eq!(backend.quantity_for(1, Some("M")), Some(5));
        let shirt_m = lines
            .iter()
            .find(|l| l.size.as_deref() == Some("M"))
            .expect("shirt M");
        assert_eq!(shirt_m.quantity, 5);

        // Local-only lines pushed to the server with their quantities.
        assert_eq!(backend.quantity_for(1, Some("L")), Some(1));
        assert_eq!(backend.quantity_for(2, None), Some(3));
        assert!(lines.iter().all(|l| l.remote_id.is_some()));
    }

    #[tokio::test]
    async fn test_merge_is_idempotent() {
        let backend = Arc::new(FakeCartBackend::default());
        backend.seed(product(1, "Shirt", 3999), 2, None);

        let store = CartStore::new(backend.clone(), logged_in().await);
        store.load(vec![CartLine {
            product: product(2, "Scarf", 1250),
            quantity: 1,
            size: None,
            color: None,
            remote_id: None,
        }])
        .await;

        store.sync_with_backend().await.expect("first sync");
        let after_first = store.snapshot().await;

        store.sync_with_backend().await.expect("second sync");
        let after_second = store.snapshot().await;

        assert_eq!(after_first.len(), after_second.len());
        assert_eq!(backend.quantity_for(2, None), Some(1), "no double push");
    }

    #[tokio::test]
    async fn test_merge_aborts_on_fetch_failure() {
        let backend = Arc::new(FakeCartBackend::default());
        backend.fail_fetch.store(true, Ordering::SeqCst);

        let store = CartStore::new(backend, logged_in().await);
        store.load(vec![CartLine {
            product: product(1, "Shirt", 3999),
            quantity: 2,
            size: None,
            color: None,
            remote_id: None,
        }])
        .await;

        assert!(store.sync_with_backend().await.is_err());
        assert_eq!(store.snapshot().await.len(), 1, "local cart untouched");
    }

    #[tokio::test]
    async fn test_merge_keeps_line_when_push_fails() {
        let backend = Arc::new(FakeCartBackend::default());
        backend.fail_add.store(true, Ordering::SeqCst);

        let store = CartStore::new(backend.clone(), logged_in().await);
        store.load(vec![CartLine {
            product: product(1, "Shirt", 3999),
            quantity: 2,
            size: None,
            color: None,
            remote_id: None,
        }])
        .await;

        store.sync_with_backend().await.expect("sync completes");

        let lines = store.snapshot().await;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].remote_id.is_none(), "kept locally, retried later");
        assert_eq!(backend.row_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_local_only() {
        let backend = Arc::new(FakeCartBackend::default());
        backend.seed(product(1, "Shirt", 3999), 2, None);

        let store = CartStore::new(backend.clone(), logged_in().await);
        store.fetch().await.expect("fetch");
        store.clear_on_logout().await;

        assert!(store.snapshot().await.is_empty());
        assert_eq!(backend.row_count(), 1, "server cart untouched");
    }
}
