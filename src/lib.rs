//! Libris Library Lending System
//!
//! A Rust back end for library lending: members borrow and return
//! books, loans accrue late fees, and a query surface reports
//! loan-derived book availability.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
