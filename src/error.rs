//! Error types for the PPE loan server

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Application error codes returned in response bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 2,
    NoSuchData = 3,
    BadValue = 4,
    InactiveEmployee = 5,
    InsufficientStock = 6,
    EquipmentExpired = 7,
    InvalidState = 8,
    OpenLoansExist = 9,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// One or more request fields failed a local check; carries the
    /// field -> messages mapping.
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("Referential error: {0}")]
    Referential(String),

    #[error("Insufficient stock: {available} available")]
    InsufficientStock { available: i32 },

    #[error("Equipment expired: {0}")]
    EquipmentExpired(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conflicting deletion: {0}")]
    ConflictingDeletion(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Per-field validation messages, present for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    /// Current availability, present for insufficient-stock failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<i32>,
}

/// Flatten validator output into a field -> messages map
fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let mut available = None;

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone())
            }
            AppError::Validation(errors) => {
                fields = Some(field_messages(errors));
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::BadValue,
                    "Validation failed".to_string(),
                )
            }
            AppError::Referential(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::InactiveEmployee, msg.clone())
            }
            AppError::InsufficientStock { available: avail } => {
                available = Some(*avail);
                (
                    StatusCode::CONFLICT,
                    ErrorCode::InsufficientStock,
                    format!("Insufficient stock: {} available", avail),
                )
            }
            AppError::EquipmentExpired(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::EquipmentExpired, msg.clone())
            }
            AppError::InvalidState(msg) => {
                (StatusCode::CONFLICT, ErrorCode::InvalidState, msg.clone())
            }
            AppError::ConflictingDeletion(msg) => {
                (StatusCode::CONFLICT, ErrorCode::OpenLoansExist, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            errors: fields,
            available,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
