//! Unified error handling for the client.
//!
//! Every failure is non-fatal: callers turn an [`AppError`] into a notice
//! with [`AppError::notice_message`] and carry on with the state they had.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::services::payments::PaymentError;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Form input rejected locally.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Checkout transition rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Payment could not be started.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sign-in rejected; carries the message to show.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Referenced item is not in the current list.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this failure points at a bug or an outage rather than user input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Api(e) | Self::Payment(PaymentError::Api(e)) => e.is_transport(),
            Self::Storage(_) | Self::Config(_) => true,
            _ => false,
        }
    }

    /// Text for a user-facing notice. Never exposes internals.
    #[must_use]
    pub fn notice_message(&self) -> String {
        match self {
            Self::Api(e) | Self::Payment(PaymentError::Api(e)) => api_notice(e),
            Self::Validation(e) => e.to_string(),
            Self::Checkout(e) => e.to_string(),
            Self::Payment(e) => e.to_string(),
            Self::Storage(_) => "Could not save local data".to_string(),
            Self::Config(e) => e.to_string(),
            Self::LoginFailed(message) => message.clone(),
            Self::NotFound(what) => format!("{what} not found"),
        }
    }

    /// Log the error, capturing internal failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Client error"
            );
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
    }
}

fn api_notice(error: &ApiError) -> String {
    if let Some(message) = error.server_message() {
        return message.to_string();
    }
    match error {
        ApiError::RateLimited(secs) => format!("Too many requests, try again in {secs} seconds"),
        ApiError::NotFound(_) => "The requested item was not found".to_string(),
        e if e.is_transport() => "Could not reach the server, please try again".to_string(),
        _ => "Something went wrong".to_string(),
    }
}

/// Set the Sentry user context from the signed-in account.
pub fn set_sentry_user(user_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Category c1".to_string());
        assert_eq!(err.to_string(), "Not found: Category c1");
        assert_eq!(err.notice_message(), "Category c1 not found");
    }

    #[test]
    fn test_server_message_is_shown() {
        let err = AppError::from(ApiError::Status {
            status: 409,
            message: Some("Category already exists".to_string()),
        });
        assert_eq!(err.notice_message(), "Category already exists");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::from(ApiError::Parse("expected value at line 1".to_string()));
        assert!(err.is_internal());
        assert_eq!(
            err.notice_message(),
            "Could not reach the server, please try again"
        );

        let err = AppError::from(ApiError::Status {
            status: 500,
            message: None,
        });
        assert_eq!(err.notice_message(), "Something went wrong");
    }

    #[test]
    fn test_validation_notice_lists_fields() {
        let err = AppError::from(ValidationError::single("name", "Name is required"));
        assert_eq!(err.notice_message(), "Name is required");
    }
}
