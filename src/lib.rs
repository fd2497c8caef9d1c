//! PPE Loan Management System
//!
//! A REST JSON API server tracking loans of personal protective equipment
//! to employees: who holds what, how many units, since when, and how each
//! loan was resolved. Equipment stock and loan records move together in
//! atomic transactions.

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
