//! Loan lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{EditLoanStatus, LoanDetails, LoanQuery, OpenLoan, ResolveLoan},
    services::loans::ResolveOutcome,
};

/// List loans, optionally filtered by employee, equipment, status or overdue
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "Loan list", body = Vec<LoanDetails>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list(&query).await?;
    Ok(Json(loans))
}

/// Get loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get(id).await?;
    Ok(Json(loan))
}

/// Open a new loan, reserving equipment stock
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = OpenLoan,
    responses(
        (status = 201, description = "Loan opened", body = LoanDetails),
        (status = 400, description = "Invalid fields"),
        (status = 404, description = "Employee or equipment not found"),
        (status = 409, description = "Insufficient stock"),
        (status = 422, description = "Employee inactive or equipment expired")
    )
)]
pub async fn open_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<OpenLoan>,
) -> AppResult<(StatusCode, Json<LoanDetails>)> {
    let loan = state.services.loans.open_loan(&request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Resolve a loan fully or partially; a partial resolution splits the loan
#[utoipa::path(
    post,
    path = "/loans/{id}/resolve",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    request_body = ResolveLoan,
    responses(
        (status = 200, description = "Loan resolved", body = ResolveOutcome),
        (status = 400, description = "Invalid fields"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already terminal, issued, or quantity over balance")
    )
)]
pub async fn resolve_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ResolveLoan>,
) -> AppResult<Json<ResolveOutcome>> {
    let outcome = state.services.loans.resolve_loan(id, &request).await?;
    Ok(Json(outcome))
}

/// Administrative status edit between open statuses
#[utoipa::path(
    put,
    path = "/loans/{id}/status",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    request_body = EditLoanStatus,
    responses(
        (status = 200, description = "Status updated", body = LoanDetails),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Edit not allowed from the current status")
    )
)]
pub async fn edit_loan_status(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<EditLoanStatus>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.edit_status(id, &request).await?;
    Ok(Json(loan))
}

/// Get loans for a specific employee
#[utoipa::path(
    get,
    path = "/employees/{id}/loans",
    tag = "loans",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee's loans", body = Vec<LoanDetails>),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee_loans(
    State(state): State<crate::AppState>,
    Path(employee_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_by_employee(employee_id).await?;
    Ok(Json(loans))
}

/// Get loans against a specific equipment type
#[utoipa::path(
    get,
    path = "/equipment/{id}/loans",
    tag = "loans",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Loans against the equipment", body = Vec<LoanDetails>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment_loans(
    State(state): State<crate::AppState>,
    Path(equipment_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_by_equipment(equipment_id).await?;
    Ok(Json(loans))
}
