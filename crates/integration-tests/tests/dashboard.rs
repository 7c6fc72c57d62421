//! Chart datasets are cached for a fixed window.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::Method;
use storedesk_client::ApiClient;
use storedesk_client::services::DashboardService;
use storedesk_integration_tests::FakeBackend;

#[tokio::test]
async fn test_second_chart_fetch_uses_cache() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let api = ApiClient::new(&backend.config(dir.path())).unwrap();
    let dashboard = DashboardService::new(&api);

    let first = dashboard.top_items().await.unwrap();
    let second = dashboard.top_items().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(backend.count(&Method::GET, "/sales/top-items"), 1);

    let widths: Vec<f64> = first.iter().map(|b| b.width).collect();
    assert!((widths[0] - 100.0).abs() < f64::EPSILON);
    assert!((widths[1] - 25.0).abs() < f64::EPSILON);

    let (heatmap, cells) = dashboard.transactions_by_hour().await.unwrap();
    dashboard.transactions_by_hour().await.unwrap();
    assert_eq!(backend.count(&Method::GET, "/sales/transactions-by-hour"), 1);
    assert_eq!(heatmap.days, vec!["Mon", "Tue"]);
    assert!(cells[1][0].light_text);
    assert!(!cells[0][1].light_text);
}

#[tokio::test]
async fn test_chart_cache_expires() {
    let backend = FakeBackend::start().await;
    let base = backend.url().parse().unwrap();
    let api = ApiClient::with_chart_ttl(base, Duration::from_millis(50)).unwrap();

    api.top_items().await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    api.top_items().await.unwrap();
    assert_eq!(backend.count(&Method::GET, "/sales/top-items"), 2);
}

#[tokio::test]
async fn test_invalidate_charts_forces_refetch() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let api = ApiClient::new(&backend.config(dir.path())).unwrap();

    api.transactions_by_hour().await.unwrap();
    api.invalidate_charts().await;
    api.transactions_by_hour().await.unwrap();
    assert_eq!(backend.count(&Method::GET, "/sales/transactions-by-hour"), 2);
}
