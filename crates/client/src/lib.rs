//! StoreDesk client library.
//!
//! Everything a StoreDesk front end needs besides rendering:
//!
//! - [`api`] - REST client for the store backend, with chart caching
//! - [`session`] - Session gate: token, role, landing route and menus
//! - [`cart`] and [`checkout`] - Cart and the four-step checkout
//! - [`mirror`] - Client-held copies of server lists
//! - [`services`] - Managers for products, categories, employees, users,
//!   orders, payments and the dashboard
//! - [`app`] - Ties the pieces together over durable storage

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod mirror;
pub mod notify;
pub mod routes;
pub mod services;
pub mod session;
pub mod storage;
pub mod validation;

pub use api::{ApiClient, ApiError};
pub use app::App;
pub use config::ClientConfig;
pub use error::AppError;
pub use notify::{Notice, NoticeLevel, Notifier};
pub use session::{SessionGate, View};
