//! Subcommand implementations.

pub mod auth;
pub mod catalog;
pub mod categories;
pub mod dashboard;
pub mod employees;
pub mod payments;
pub mod shop;
pub mod users;

use storedesk_client::AppError;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Could not read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    InvalidArgument(String),
}

impl From<storedesk_client::ApiError> for CliError {
    fn from(e: storedesk_client::ApiError) -> Self {
        Self::App(e.into())
    }
}
