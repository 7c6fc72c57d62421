//! Sign-in, registration and password recovery.

use storedesk_core::Role;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::routes::{self, Route};
use crate::session::SessionGate;
use crate::validation;

/// Shown when the backend rejects a sign-in without saying why.
pub const LOGIN_FAILED: &str = "Invalid email or password";

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub role: Role,
    pub landing: Route,
    pub greeting: String,
}

/// Authentication service.
///
/// Keeps the session gate and the API client's bearer token in step.
pub struct AuthService<'a> {
    api: &'a ApiClient,
    session: &'a mut SessionGate,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient, session: &'a mut SessionGate) -> Self {
        Self { api, session }
    }

    /// Validate the credentials, sign in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for bad input, `AppError::LoginFailed`
    /// with the backend's message (or [`LOGIN_FAILED`]) when the backend
    /// rejects the credentials, and `AppError::Api` when it cannot be reached.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<SignedIn, AppError> {
        let credentials = validation::validate_login(email, password)?;

        let response = match self
            .api
            .login(&credentials.email, &credentials.password)
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_transport() => return Err(e.into()),
            Err(e) => {
                let message = e.server_message().unwrap_or(LOGIN_FAILED).to_string();
                return Err(AppError::LoginFailed(message));
            }
        };

        let landing = routes::landing_route_for(response.user.raw_role());
        let user = response.user.into_current_user();
        let role = user.role;
        let greeting = format!("Welcome back, {}!", user.email.local_part());
        set_sentry_user(user.id.as_str(), Some(user.email.as_str()));

        self.session.set_current_user(user)?;
        self.session.login(&response.token, role)?;
        self.api.set_token(self.session.token().cloned()).await;

        info!(%role, landing = %landing, "Login successful");
        Ok(SignedIn {
            role,
            landing,
            greeting,
        })
    }

    /// Sign out and forget the token.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be updated; the in-memory session
    /// and the API token are cleared regardless.
    pub async fn logout(&mut self) -> Result<(), AppError> {
        let result = self.session.logout();
        self.api.set_token(None).await;
        clear_sentry_user();
        result.map_err(AppError::from)
    }

    /// Create an account. Returns the message to show.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid or the backend rejects it.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<String, AppError> {
        let form = validation::validate_registration(email, password, role)?;
        let response = self
            .api
            .register(&form.email, &form.password, form.role)
            .await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Registered successfully!".to_string()))
    }

    /// Request a password reset link. Returns the message to show.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is invalid or the request fails.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<String, AppError> {
        let email = validation::validate_forgot_password(email)?;
        let response = self.api.forgot_password(&email).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Password reset link sent! Check your email.".to_string()))
    }

    /// Set a new password with the token from a reset link.
    ///
    /// # Errors
    ///
    /// Returns an error if the password is empty or the token is rejected.
    #[instrument(skip(self, token, password))]
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<String, AppError> {
        let password = validation::validate_reset_password(password)?;
        let response = self.api.reset_password(token, &password).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Password reset successful!".to_string()))
    }
}
