//! Employee model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Employee record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    /// Unique, stored lowercase
    pub email: String,
    /// Unique badge / registration number
    pub badge_number: String,
    /// Job title
    pub role: String,
    /// Inactive employees may not receive new loans
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployee {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Badge number is required"))]
    pub badge_number: String,
    #[validate(length(min = 2, message = "Role must be at least 2 characters"))]
    pub role: String,
    pub active: Option<bool>,
}

/// Update employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployee {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Badge number is required"))]
    pub badge_number: Option<String>,
    #[validate(length(min = 2, message = "Role must be at least 2 characters"))]
    pub role: Option<String>,
    pub active: Option<bool>,
}
