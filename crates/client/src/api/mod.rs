//! REST client for the storefront backend.
//!
//! Every request is joined onto the configured base URL, carries an
//! `x-request-id` header and, when a session token is set, an
//! `Authorization: Bearer <token>` header. Error bodies are read for their
//! `error` or `message` field.
//!
//! The endpoint methods live in one submodule per resource.

mod auth;
mod cache;
mod categories;
mod dashboard;
mod employees;
mod orders;
mod payments;
mod products;
pub mod types;
mod users;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use cache::CacheValue;

/// How long the dashboard chart datasets are reused before refetching.
pub const CHART_CACHE_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        status: u16,
        /// The body's `error` or `message` field, when present.
        message: Option<String>,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Message the backend attached to a rejection, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the failure happened below the HTTP layer or in decoding.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Parse(_) | Self::InvalidUrl(_))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share the connection pool, the token and the chart
/// cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
    cache: Cache<&'static str, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_chart_ttl(config.api_url.clone(), CHART_CACHE_TTL)
    }

    /// Create a client with a custom chart cache lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_chart_ttl(base_url: Url, ttl: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("storedesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                token: RwLock::new(None),
                cache,
            }),
        })
    }

    /// Base URL every path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Set or clear the bearer token sent with every request.
    pub async fn set_token(&self, token: Option<SecretString>) {
        *self.inner.token.write().await = token;
    }

    /// Whether a bearer token is currently set.
    pub async fn has_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    /// Drop cached chart datasets.
    pub async fn invalidate_charts(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    /// Resolve a possibly relative URL (e.g. an uploaded file) against the base URL.
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        self.inner
            .base_url
            .join(url.trim_start_matches('/'))
            .map_or_else(|_| url.to_string(), String::from)
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;

        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header("x-request-id", uuid::Uuid::new_v4().to_string());

        if let Some(token) = self.inner.token.read().await.as_ref() {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    /// Send a request and decode the JSON response.
    #[instrument(skip(self, builder))]
    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ApiError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(path.to_string()));
            }
            let body: ErrorBody = serde_json::from_str(&response_text).unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.error.or(body.message),
            });
        }

        let raw = if response_text.trim().is_empty() {
            "null"
        } else {
            response_text.as_str()
        };
        serde_json::from_str(raw).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).await?;
        self.execute(path, builder).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).await?.query(query);
        self.execute(path, builder).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).await?.json(body);
        self.execute(path, builder).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::PUT, path).await?.json(body);
        self.execute(path, builder).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path).await?;
        let _: serde_json::Value = self.execute(path, builder).await?;
        Ok(())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).await?.multipart(form);
        self.execute(path, builder).await
    }

    async fn cached(&self, key: &'static str) -> Option<CacheValue> {
        let value = self.inner.cache.get(key).await;
        if value.is_some() {
            debug!(key, "Cache hit");
        }
        value
    }

    async fn cache_insert(&self, key: &'static str, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::with_chart_ttl(
            Url::parse("https://api.example.com/v1/").unwrap(),
            CHART_CACHE_TTL,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_url() {
        let client = client();
        assert_eq!(
            client.resolve_url("/uploads/a.png"),
            "https://api.example.com/v1/uploads/a.png"
        );
        assert_eq!(
            client.resolve_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_server_message() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Email already exists".to_string()),
        };
        assert_eq!(err.server_message(), Some("Email already exists"));
        assert_eq!(err.to_string(), "API error 400: Email already exists");
        assert!(!err.is_transport());

        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error 500: no details");
    }

    #[tokio::test]
    async fn test_token_roundtrip() {
        let client = client();
        assert!(!client.has_token().await);
        client
            .set_token(Some(SecretString::from("abc".to_string())))
            .await;
        assert!(client.clone().has_token().await);
        client.set_token(None).await;
        assert!(!client.has_token().await);
    }
}
