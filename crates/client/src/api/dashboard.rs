//! Dashboard chart datasets, each cached for [`CHART_CACHE_TTL`](super::CHART_CACHE_TTL).

use std::sync::Arc;

use tracing::instrument;

use super::cache::{self, CacheValue};
use super::types::{Heatmap, SalesItem};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Top-selling items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. Failures are not cached.
    #[instrument(skip(self))]
    pub async fn top_items(&self) -> Result<Arc<Vec<SalesItem>>, ApiError> {
        if let Some(CacheValue::TopItems(items)) = self.cached(cache::TOP_ITEMS).await {
            return Ok(items);
        }

        let items: Arc<Vec<SalesItem>> = Arc::new(self.get("sales/top-items").await?);
        self.cache_insert(cache::TOP_ITEMS, CacheValue::TopItems(Arc::clone(&items)))
            .await;
        Ok(items)
    }

    /// Transaction counts per time slot and weekday.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. Failures are not cached.
    #[instrument(skip(self))]
    pub async fn transactions_by_hour(&self) -> Result<Arc<Heatmap>, ApiError> {
        if let Some(CacheValue::Heatmap(heatmap)) =
            self.cached(cache::TRANSACTIONS_BY_HOUR).await
        {
            return Ok(heatmap);
        }

        let heatmap: Arc<Heatmap> = Arc::new(self.get("sales/transactions-by-hour").await?);
        self.cache_insert(
            cache::TRANSACTIONS_BY_HOUR,
            CacheValue::Heatmap(Arc::clone(&heatmap)),
        )
        .await;
        Ok(heatmap)
    }
}
