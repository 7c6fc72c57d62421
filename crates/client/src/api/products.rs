//! Products: the shop listing, the admin product editor and image uploads.
//!
//! The backend stores products under `/class`; the admin editor reads the
//! full catalogue from `/class/mara`.

use reqwest::multipart::{Form, Part};
use storedesk_core::ProductId;
use tracing::instrument;

use super::types::{ListBody, Product, ProductFilter, ProductInput, UploadResponse};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Shop listing, optionally filtered by a search term and category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        let body: ListBody<Product> = self.get_with_query("class", filter).await?;
        Ok(body.into_vec())
    }

    /// Create a product from the shop screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the product.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        self.post("products", input).await
    }

    /// Full catalogue for the admin editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_classes(&self) -> Result<Vec<Product>, ApiError> {
        let body: ListBody<Product> = self.get("class/mara").await?;
        Ok(body.into_vec())
    }

    /// Create a product from the admin editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the product.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_class(&self, input: &ProductInput) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("class/create", input).await?;
        Ok(())
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update_class(&self, id: &ProductId, input: &ProductInput) -> Result<(), ApiError> {
        let _: serde_json::Value = self.put(&format!("class/{id}"), input).await?;
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_class(&self, id: &ProductId) -> Result<(), ApiError> {
        self.delete(&format!("class/{id}")).await
    }

    /// Upload a product image and return its absolute URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the MIME type is invalid or the upload fails.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);
        let response: UploadResponse = self.post_multipart("uploads", form).await?;
        Ok(self.resolve_url(&response.file_url))
    }
}
