//! Product management operations, including bulk CSV and image uploads.

use reqwest::multipart::{Form, Part};
use tracing::instrument;

use tamarind_core::ProductId;

use super::AdminClient;
use super::endpoints;
use super::types::{
    AdminProduct, AdminProductEnvelope, AdminProductPage, BulkImageUpload, BulkUploadReport,
    ImageUpload, ListQuery, ProductInput,
};
use crate::error::Result;

impl AdminClient {
    /// List products, inactive rows included.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query))]
    pub async fn list_products(&self, query: &ListQuery) -> Result<AdminProductPage> {
        self.get_json(endpoints::PRODUCTS, &query.to_pairs()).await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown products.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<AdminProduct> {
        let envelope: AdminProductEnvelope = self.get_json(&endpoints::product(id), &[]).await?;
        Ok(envelope.product)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails server-side.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<AdminProduct> {
        let envelope: AdminProductEnvelope = self.post_json(endpoints::PRODUCTS, input).await?;
        Ok(envelope.product)
    }

    /// Update a product; only set fields change.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(&self, id: ProductId, input: &ProductInput) -> Result<AdminProduct> {
        let envelope: AdminProductEnvelope = self.put_json(&endpoints::product(id), input).await?;
        Ok(envelope.product)
    }

    /// Flip a product's active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn toggle_product_status(&self, id: ProductId) -> Result<AdminProduct> {
        let response = self
            .execute(|client| client.post(self.url(&endpoints::product_toggle_status(id))))
            .await?;
        let envelope: AdminProductEnvelope = self.decode(response).await?;
        Ok(envelope.product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.delete(&endpoints::product(id)).await
    }

    /// Bulk-create products from a CSV file (multipart upload).
    ///
    /// The backend processes rows independently and reports per-row
    /// failures in the returned report rather than rejecting the whole
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload itself fails; row-level problems come
    /// back inside the [`BulkUploadReport`].
    #[instrument(skip(self, csv_bytes), fields(file_name, bytes = csv_bytes.len()))]
    pub async fn bulk_upload_products(
        &self,
        file_name: &str,
        csv_bytes: Vec<u8>,
    ) -> Result<BulkUploadReport> {
        let file_name = file_name.to_string();
        let response = self
            .execute(move |client| {
                let part = Part::bytes(csv_bytes.clone()).file_name(file_name.clone());
                let form = Form::new().part("file", part);
                client.post(self.url(endpoints::PRODUCTS_BULK_UPLOAD)).multipart(form)
            })
            .await?;
        self.decode(response).await
    }

    /// Upload a single product image, returning its served URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, image_bytes), fields(file_name, bytes = image_bytes.len()))]
    pub async fn upload_image(&self, file_name: &str, image_bytes: Vec<u8>) -> Result<ImageUpload> {
        let file_name = file_name.to_string();
        let response = self
            .execute(move |client| {
                let part = Part::bytes(image_bytes.clone()).file_name(file_name.clone());
                let form = Form::new().part("image", part);
                client.post(self.url(endpoints::UPLOAD_IMAGE)).multipart(form)
            })
            .await?;
        self.decode(response).await
    }

    /// Upload several product images in one request, returning their URLs
    /// in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub async fn upload_images(&self, images: Vec<(String, Vec<u8>)>) -> Result<Vec<String>> {
        let response = self
            .execute(move |client| {
                let mut form = Form::new();
                for (file_name, bytes) in &images {
                    form = form.part(
                        "images",
                        Part::bytes(bytes.clone()).file_name(file_name.clone()),
                    );
                }
                client.post(self.url(endpoints::UPLOAD_IMAGES)).multipart(form)
            })
            .await?;
        let uploaded: BulkImageUpload = self.decode(response).await?;
        Ok(uploaded.urls)
    }
}
