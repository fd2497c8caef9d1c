//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::LoanStatus;

/// Loan record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i32,
    pub employee_id: i32,
    pub equipment_id: i32,
    pub quantity: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub resolution_date: Option<DateTime<Utc>>,
    pub status: i16,
    pub note: Option<String>,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        LoanStatus::from(self.status)
    }
}

/// Loan with joined employee/equipment details for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub employee_id: i32,
    pub employee_name: String,
    pub badge_number: String,
    pub equipment_id: i32,
    pub equipment_name: String,
    pub category: String,
    pub quantity: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub resolution_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub note: Option<String>,
    pub resolution_note: Option<String>,
    /// Open and past its due date
    pub is_overdue: bool,
}

/// Open loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OpenLoan {
    pub employee_id: i32,
    pub equipment_id: i32,
    #[validate(range(min = 1, message = "Quantity must be greater than zero"))]
    pub quantity: i32,
    /// Must be strictly in the future
    pub due_date: DateTime<Utc>,
    /// One of the open statuses; defaults to ON_LOAN
    pub status: Option<LoanStatus>,
    pub note: Option<String>,
}

/// Resolve loan request (full or partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResolveLoan {
    /// Target terminal status
    pub status: LoanStatus,
    /// Units being resolved; less than the loan quantity splits the loan
    #[validate(range(min = 1, message = "Resolved quantity must be greater than zero"))]
    pub quantity: i32,
    /// Not in the future, not before the loan date
    pub resolution_date: DateTime<Utc>,
    pub resolution_note: Option<String>,
}

/// Administrative status edit between open statuses
#[derive(Debug, Deserialize, ToSchema)]
pub struct EditLoanStatus {
    pub status: LoanStatus,
}

/// Loan list filter
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct LoanQuery {
    pub employee_id: Option<i32>,
    pub equipment_id: Option<i32>,
    pub status: Option<LoanStatus>,
    /// Only open loans past their due date
    pub overdue: Option<bool>,
}
