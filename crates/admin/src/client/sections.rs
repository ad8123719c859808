//! Section management operations.

use tracing::instrument;

use tamarind_core::SectionId;

use super::AdminClient;
use super::endpoints;
use super::types::{
    AdminSection, AdminSectionEnvelope, AdminSectionsEnvelope, SectionInput, SectionReorder,
};
use crate::error::Result;

impl AdminClient {
    /// List sections in display order, inactive rows included.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_sections(&self) -> Result<Vec<AdminSection>> {
        let envelope: AdminSectionsEnvelope = self.get_json(endpoints::SECTIONS, &[]).await?;
        Ok(envelope.sections)
    }

    /// Create a section.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails server-side.
    #[instrument(skip(self, input))]
    pub async fn create_section(&self, input: &SectionInput) -> Result<AdminSection> {
        let envelope: AdminSectionEnvelope = self.post_json(endpoints::SECTIONS, input).await?;
        Ok(envelope.section)
    }

    /// Update a section; only set fields change.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, input), fields(section_id = %id))]
    pub async fn update_section(&self, id: SectionId, input: &SectionInput) -> Result<AdminSection> {
        let envelope: AdminSectionEnvelope = self.put_json(&endpoints::section(id), input).await?;
        Ok(envelope.section)
    }

    /// Flip a section's active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(section_id = %id))]
    pub async fn toggle_section_status(&self, id: SectionId) -> Result<AdminSection> {
        let response = self
            .execute(|client| client.post(self.url(&endpoints::section_toggle_status(id))))
            .await?;
        let envelope: AdminSectionEnvelope = self.decode(response).await?;
        Ok(envelope.section)
    }

    /// Delete a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section still has products or the request
    /// fails.
    #[instrument(skip(self), fields(section_id = %id))]
    pub async fn delete_section(&self, id: SectionId) -> Result<()> {
        self.delete(&endpoints::section(id)).await
    }

    /// Reorder sections; the first id is displayed first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, order), fields(count = order.section_ids.len()))]
    pub async fn reorder_sections(&self, order: &SectionReorder) -> Result<Vec<AdminSection>> {
        let envelope: AdminSectionsEnvelope =
            self.put_json(endpoints::SECTIONS_REORDER, order).await?;
        Ok(envelope.sections)
    }
}
