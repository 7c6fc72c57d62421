//! Cache types for the dashboard datasets.

use std::sync::Arc;

use super::types::{Heatmap, SalesItem};

/// Cache key for the top-selling items chart.
pub const TOP_ITEMS: &str = "sales:top-items";
/// Cache key for the transactions-by-hour heatmap.
pub const TRANSACTIONS_BY_HOUR: &str = "sales:transactions-by-hour";

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    TopItems(Arc<Vec<SalesItem>>),
    Heatmap(Arc<Heatmap>),
}
