//! Product categories.

use storedesk_core::CategoryId;
use tracing::instrument;

use super::types::{Category, CategoryInput, ListBody, ListQuery, Page};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// One page of categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self, query: &ListQuery) -> Result<Page<Category>, ApiError> {
        self.get_with_query("categories", query).await
    }

    /// Every category, for pickers. Accepts both wrapped and bare lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_categories(&self) -> Result<Vec<Category>, ApiError> {
        let body: ListBody<Category> = self.get("categories").await?;
        Ok(body.into_vec())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the category.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("categories", input).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self.put(&format!("categories/{id}"), input).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), ApiError> {
        self.delete(&format!("categories/{id}")).await
    }
}
