//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREDESK_API_URL` - Base URL of the storefront API
//!   (default: `https://student-management-backend-node-rd8.vercel.app`)
//! - `STOREDESK_STATE_DIR` - Directory for durable client storage
//!   (default: `<platform data dir>/storedesk`)
//! - `STOREDESK_PAYMENT_KEY_ID` - Public key id handed to the hosted checkout widget
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use storedesk_core::CurrencyCode;
use thiserror::Error;
use url::Url;

/// Default API endpoint used when `STOREDESK_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://student-management-backend-node-rd8.vercel.app";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No data directory available; set STOREDESK_STATE_DIR")]
    NoStateDir,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is joined onto.
    pub api_url: Url,
    /// Directory holding the durable key-value store.
    pub state_dir: PathBuf,
    /// Store currency for prices and totals.
    pub currency: CurrencyCode,
    /// Payment gateway settings.
    pub payments: PaymentConfig,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment name.
    pub sentry_environment: Option<String>,
}

/// Hosted checkout widget configuration.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Public key id; payments are refused when absent.
    pub key_id: Option<String>,
    /// Merchant name shown in the widget.
    pub merchant_name: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            merchant_name: "Student Payments".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL does not parse or no state
    /// directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("STOREDESK_API_URL", DEFAULT_API_URL))?;
        let state_dir = match get_optional_env("STOREDESK_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_state_dir()?,
        };
        let payments = PaymentConfig {
            key_id: get_optional_env("STOREDESK_PAYMENT_KEY_ID"),
            ..PaymentConfig::default()
        };

        Ok(Self {
            api_url,
            state_dir,
            currency: CurrencyCode::INR,
            payments,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at an explicit API URL and state directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse.
    pub fn new(api_url: &str, state_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            state_dir: state_dir.into(),
            currency: CurrencyCode::INR,
            payments: PaymentConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the API base URL, making sure relative joins keep its path.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("STOREDESK_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "STOREDESK_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_state_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("storedesk"))
        .ok_or(ConfigError::NoStateDir)
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_appends_slash() {
        let url = parse_api_url("https://api.example.com/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/");
        assert_eq!(url.join("categories").unwrap().path(), "/v1/categories");
    }

    #[test]
    fn test_parse_api_url_root() {
        let url = parse_api_url("http://127.0.0.1:5000").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/");
    }

    #[test]
    fn test_parse_api_url_rejects_garbage() {
        assert!(matches!(
            parse_api_url("not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            parse_api_url("ftp://example.com"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = ClientConfig::new(DEFAULT_API_URL, "/tmp/storedesk").unwrap();
        assert_eq!(config.currency, CurrencyCode::INR);
        assert!(config.payments.key_id.is_none());
        assert_eq!(config.payments.merchant_name, "Student Payments");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/storedesk"));
    }
}
