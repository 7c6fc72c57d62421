//! Placed orders (read only).

use tracing::instrument;

use super::types::{ListBody, Order};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// List placed orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let body: ListBody<Order> = self.get("orders").await?;
        Ok(body.into_vec())
    }
}
