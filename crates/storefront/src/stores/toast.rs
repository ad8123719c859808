//! Transient notification (toast) state container.
//!
//! Purely local: toasts never touch the network. Expiry is pull-based via
//! [`ToastStore::sweep`] so the container works without a background task;
//! callers sweep before rendering.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

/// Default time a toast stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

/// A single notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
    expires_at: Instant,
}

impl Toast {
    /// Whether this toast has passed its expiry.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Toast state container.
#[derive(Clone, Default)]
pub struct ToastStore {
    toasts: Arc<RwLock<Vec<Toast>>>,
}

impl ToastStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a toast with the default TTL, returning its id.
    pub async fn push(&self, level: ToastLevel, message: impl Into<String>) -> Uuid {
        self.push_with_ttl(level, message, DEFAULT_TTL).await
    }

    /// Push a toast with an explicit TTL.
    pub async fn push_with_ttl(
        &self,
        level: ToastLevel,
        message: impl Into<String>,
        ttl: Duration,
    ) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            expires_at: Instant::now() + ttl,
        };
        let id = toast.id;
        self.toasts.write().await.push(toast);
        id
    }

    pub async fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Success, message).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Error, message).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Info, message).await
    }

    /// Dismiss a toast before its TTL elapses.
    pub async fn dismiss(&self, id: Uuid) {
        self.toasts.write().await.retain(|t| t.id != id);
    }

    /// Drop expired toasts and return the ones still visible, oldest first.
    pub async fn sweep(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut toasts = self.toasts.write().await;
        toasts.retain(|t| !t.is_expired(now));
        toasts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_drops_expired() {
        let store = ToastStore::new();
        store
            .push_with_ttl(ToastLevel::Info, "gone", Duration::ZERO)
            .await;
        let kept = store.success("saved").await;

        let visible = store.sweep().await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, kept);
        assert_eq!(visible[0].level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn test_dismiss_removes_toast() {
        let store = ToastStore::new();
        let id = store.error("boom").await;
        store.dismiss(id).await;
        assert!(store.sweep().await.is_empty());
    }

    #[tokio::test]
    async fn test_toasts_keep_insertion_order() {
        let store = ToastStore::new();
        store.info("first").await;
        store.info("second").await;

        let visible = store.sweep().await;
        assert_eq!(visible[0].message, "first");
        assert_eq!(visible[1].message, "second");
    }
}
