//! Back-office accounts. The backend returns the whole list; search and
//! pagination happen client side.

use storedesk_core::UserId;
use tracing::instrument;

use super::types::{ListBody, User, UserInput};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let body: ListBody<User> = self.get("users").await?;
        Ok(body.into_vec())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the account.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: &UserInput) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("users", input).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update_user(&self, id: &UserId, input: &UserInput) -> Result<(), ApiError> {
        let _: serde_json::Value = self.put(&format!("users/{id}"), input).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), ApiError> {
        self.delete(&format!("users/{id}")).await
    }
}
