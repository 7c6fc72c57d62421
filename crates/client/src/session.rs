//! Session gate.
//!
//! Holds the bearer token and role of the signed-in account, mirrors both to
//! durable storage on every change, and decides which route tree is visible.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use storedesk_core::Role;
use tracing::{debug, info};

use crate::api::types::CurrentUser;
use crate::routes::{self, MenuItem, Navigation, Route};
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Which route tree renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Sign-in and account recovery.
    Public,
    /// The back-office and shop.
    Private,
}

/// The gate deciding between the public and the private application.
pub struct SessionGate {
    store: Arc<dyn KeyValueStore>,
    token: Option<SecretString>,
    role: Role,
    user: Option<CurrentUser>,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    /// Restore the session from storage.
    ///
    /// Never fails: a missing or blank token means signed out, and a missing
    /// or unrecognised role becomes [`Role::User`].
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let token = store
            .get(keys::TOKEN)
            .filter(|t| !t.is_empty())
            .map(SecretString::from);
        let role = Role::parse_or_default(store.get(keys::ROLE).as_deref());
        let user = storage::get_json(store.as_ref(), keys::USER);

        debug!(authenticated = token.is_some(), %role, "Session restored");
        Self {
            store,
            token,
            role,
            user,
        }
    }

    /// Record a successful sign-in and return the landing route for the role.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written to storage. The
    /// in-memory session is updated either way.
    pub fn login(&mut self, token: &str, role: Role) -> Result<Route, StorageError> {
        self.token = (!token.is_empty()).then(|| SecretString::from(token.to_string()));
        self.role = role;
        self.persist()?;
        info!(%role, "Signed in");
        Ok(routes::landing_route(role))
    }

    /// Store the account record returned at sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written to storage.
    pub fn set_current_user(&mut self, user: CurrentUser) -> Result<(), StorageError> {
        storage::set_json(self.store.as_ref(), keys::USER, &user)?;
        self.user = Some(user);
        Ok(())
    }

    /// Sign out: clear the token, reset the role to [`Role::User`] and forget
    /// the account record.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be updated. The in-memory session
    /// is cleared either way.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.token = None;
        self.role = Role::User;
        self.user = None;
        self.store.remove(keys::USER)?;
        self.persist()?;
        info!("Signed out");
        Ok(())
    }

    fn persist(&self) -> Result<(), StorageError> {
        match &self.token {
            Some(token) => self.store.set(keys::TOKEN, token.expose_secret())?,
            None => self.store.remove(keys::TOKEN)?,
        }
        self.store.set(keys::ROLE, self.role.as_str())
    }

    /// The route tree visible to this session.
    #[must_use]
    pub const fn view(&self) -> View {
        if self.is_authenticated() {
            View::Private
        } else {
            View::Public
        }
    }

    /// Whether a token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Role of the session. [`Role::User`] when signed out.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Account record stored at sign-in.
    #[must_use]
    pub const fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Where the session lands after sign-in.
    #[must_use]
    pub const fn landing_route(&self) -> Route {
        routes::landing_route(self.role)
    }

    /// Navigation entries for the session's role; empty when signed out.
    #[must_use]
    pub fn menu(&self) -> Vec<MenuItem> {
        if self.is_authenticated() {
            routes::menu(self.role)
        } else {
            Vec::new()
        }
    }

    /// Resolve a navigation against the visible route tree.
    #[must_use]
    pub fn navigate(&self, path: &str, current: Option<&Route>) -> Navigation {
        let role = self.is_authenticated().then_some(self.role);
        routes::navigate(path, role, current)
    }
}
