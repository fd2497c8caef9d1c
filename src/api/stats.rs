//! Statistics endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;

/// Generic label/value pair for breakdowns
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatEntry {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoanStats {
    pub total: i64,
    pub open: i64,
    /// Open loans past their due date
    pub overdue: i64,
    pub by_status: Vec<StatEntry>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeeStats {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EquipmentStats {
    pub total: i64,
    /// Equipment below its low-stock threshold
    pub low_stock: i64,
}

/// Overview statistics response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub loans: LoanStats,
    pub employees: EmployeeStats,
    pub equipment: EquipmentStats,
}

/// One period of loan activity
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeSeriesEntry {
    /// Month in YYYY-MM format
    pub period: String,
    pub loans: i64,
    pub resolutions: i64,
}

/// Loan activity statistics response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoanStatsResponse {
    pub total_loans: i64,
    pub total_resolutions: i64,
    pub time_series: Vec<TimeSeriesEntry>,
    pub top_equipment: Vec<StatEntry>,
    pub top_employees: Vec<StatEntry>,
    pub by_category: Vec<StatEntry>,
}

/// Date range filter for loan statistics
#[derive(Debug, Deserialize, IntoParams)]
pub struct LoanStatsQuery {
    /// Range start (defaults to 6 months ago)
    pub start_date: Option<DateTime<Utc>>,
    /// Range end (defaults to now)
    pub end_date: Option<DateTime<Utc>>,
}

/// Get overview statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Overview statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}

/// Get loan activity statistics over a date range
#[utoipa::path(
    get,
    path = "/stats/loans",
    tag = "stats",
    params(LoanStatsQuery),
    responses(
        (status = 200, description = "Loan activity statistics", body = LoanStatsResponse)
    )
)]
pub async fn get_loan_stats(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanStatsQuery>,
) -> AppResult<Json<LoanStatsResponse>> {
    let stats = state
        .services
        .stats
        .get_loan_stats(query.start_date, query.end_date)
        .await?;
    Ok(Json(stats))
}
