//! Delivery address state container.
//!
//! Addresses only exist server-side; this store is a cache over the API with
//! the same optimistic-refresh shape as the other containers.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::instrument;

use tamarind_core::AddressId;

use crate::api::ApiClient;
use crate::api::types::{Address, AddressInput};
use crate::error::Result;

/// Address state container.
#[derive(Clone)]
pub struct AddressStore {
    api: ApiClient,
    addresses: Arc<RwLock<Vec<Address>>>,
}

impl AddressStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            addresses: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of the cached addresses.
    pub async fn snapshot(&self) -> Vec<Address> {
        self.addresses.read().await.clone()
    }

    /// The default address, if one is marked.
    pub async fn default_address(&self) -> Option<Address> {
        self.addresses
            .read()
            .await
            .iter()
            .find(|a| a.is_default)
            .cloned()
    }

    /// Reload addresses from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cache is left untouched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let addresses = self.api.list_addresses().await?;
        *self.addresses.write().await = addresses;
        Ok(())
    }

    /// Create an address and insert it into the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &AddressInput) -> Result<Address> {
        let address = self.api.create_address(input).await?;
        self.addresses.write().await.push(address.clone());
        Ok(address)
    }

    /// Update an address in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, input), fields(address_id = %id))]
    pub async fn update(&self, id: AddressId, input: &AddressInput) -> Result<Address> {
        let updated = self.api.update_address(id, input).await?;
        let mut addresses = self.addresses.write().await;
        if let Some(slot) = addresses.iter_mut().find(|a| a.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cache is left untouched.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete(&self, id: AddressId) -> Result<()> {
        self.api.delete_address(id).await?;
        self.addresses.write().await.retain(|a| a.id != id);
        Ok(())
    }

    /// Mark an address as the default, clearing the previous default.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cache is left untouched.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn set_default(&self, id: AddressId) -> Result<()> {
        self.api.set_default_address(id).await?;
        let mut addresses = self.addresses.write().await;
        for address in addresses.iter_mut() {
            address.is_default = address.id == id;
        }
        Ok(())
    }

    /// Drop cached addresses on logout.
    pub async fn clear_on_logout(&self) {
        self.addresses.write().await.clear();
    }
}
