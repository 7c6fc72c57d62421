//! Authentication endpoints.

use secrecy::{ExposeSecret, SecretString};
use storedesk_core::{Email, Role};
use tracing::instrument;

use super::types::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest,
};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Exchange credentials for a bearer token and the account record.
    ///
    /// Does not store the token; the session gate decides that.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.post("auth/login", &body).await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &Email,
        password: &SecretString,
        role: Role,
    ) -> Result<MessageResponse, ApiError> {
        let body = RegisterRequest {
            email: email.as_str(),
            password: password.expose_secret(),
            role,
        };
        self.post("auth/register", &body).await
    }

    /// Ask the backend to email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn forgot_password(&self, email: &Email) -> Result<MessageResponse, ApiError> {
        let body = ForgotPasswordRequest {
            email: email.as_str(),
        };
        self.post("auth/forgot-password", &body).await
    }

    /// Set a new password using the token from a reset link.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token, password))]
    pub async fn reset_password(
        &self,
        token: &str,
        password: &SecretString,
    ) -> Result<MessageResponse, ApiError> {
        let body = ResetPasswordRequest {
            token,
            password: password.expose_secret(),
        };
        self.post("auth/reset-password", &body).await
    }
}
