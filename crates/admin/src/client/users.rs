//! User management operations.

use tracing::instrument;

use tamarind_core::UserId;

use super::AdminClient;
use super::endpoints;
use super::types::{ListQuery, ManagedUser, ManagedUserEnvelope, UserPage, UserUpdate};
use crate::error::Result;

impl AdminClient {
    /// List customers, with optional search and pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query))]
    pub async fn list_users(&self, query: &ListQuery) -> Result<UserPage> {
        self.get_json(endpoints::USERS, &query.to_pairs()).await
    }

    /// Fetch one customer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown users.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<ManagedUser> {
        let envelope: ManagedUserEnvelope = self.get_json(&endpoints::user(id), &[]).await?;
        Ok(envelope.user)
    }

    /// Update a customer's name, role, or active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<ManagedUser> {
        let envelope: ManagedUserEnvelope = self.put_json(&endpoints::user(id), update).await?;
        Ok(envelope.user)
    }

    /// Flip a customer's active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn toggle_user_status(&self, id: UserId) -> Result<ManagedUser> {
        let response = self
            .execute(|client| client.post(self.url(&endpoints::user_toggle_status(id))))
            .await?;
        let envelope: ManagedUserEnvelope = self.decode(response).await?;
        Ok(envelope.user)
    }

    /// Delete a customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        self.delete(&endpoints::user(id)).await
    }
}
