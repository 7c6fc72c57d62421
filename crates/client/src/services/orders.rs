//! Placed orders, read only.

use tracing::instrument;

use super::surface;
use crate::api::ApiClient;
use crate::api::types::Order;
use crate::error::AppError;
use crate::mirror::{RefreshOutcome, RemoteMirror};
use crate::notify::Notifier;

#[derive(Debug, Clone)]
pub struct OrderHistory {
    api: ApiClient,
    notifier: Notifier,
    mirror: RemoteMirror<Order>,
}

impl OrderHistory {
    #[must_use]
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            mirror: RemoteMirror::new("orders"),
        }
    }

    #[must_use]
    pub const fn mirror(&self) -> &RemoteMirror<Order> {
        &self.mirror
    }

    /// # Errors
    ///
    /// Returns an error if the orders cannot be fetched.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<RefreshOutcome, AppError> {
        self.mirror
            .refresh(self.api.list_orders())
            .await
            .map_err(|e| surface(&self.notifier, e))
    }
}
