//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{employees, equipment, health, loans, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PPE Loan API",
        version = "1.0.0",
        description = "PPE Loan Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Employees
        employees::list_employees,
        employees::get_employee,
        employees::create_employee,
        employees::update_employee,
        employees::delete_employee,
        // Equipment
        equipment::list_equipment,
        equipment::list_low_stock,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Loans
        loans::list_loans,
        loans::get_loan,
        loans::open_loan,
        loans::resolve_loan,
        loans::edit_loan_status,
        loans::get_employee_loans,
        loans::get_equipment_loans,
        // Stats
        stats::get_stats,
        stats::get_loan_stats,
    ),
    components(
        schemas(
            // Employees
            crate::models::employee::Employee,
            crate::models::employee::CreateEmployee,
            crate::models::employee::UpdateEmployee,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            // Loans
            crate::models::enums::LoanStatus,
            crate::models::loan::LoanDetails,
            crate::models::loan::OpenLoan,
            crate::models::loan::ResolveLoan,
            crate::models::loan::EditLoanStatus,
            crate::services::loans::ResolveOutcome,
            // Stats
            stats::StatsResponse,
            stats::LoanStats,
            stats::EmployeeStats,
            stats::EquipmentStats,
            stats::StatEntry,
            stats::LoanStatsResponse,
            stats::TimeSeriesEntry,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "employees", description = "Employee management"),
        (name = "equipment", description = "PPE equipment catalog and inventory"),
        (name = "loans", description = "Loan lifecycle management"),
        (name = "stats", description = "Statistics and reporting reads")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
