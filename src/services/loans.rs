//! Loan lifecycle service
//!
//! Orchestrates the loans store and the equipment inventory ledger: opening
//! loans reserves stock, resolving credits it back according to the status
//! capability table, and partial resolutions split the loan into a resolved
//! record plus an open remainder. Every mutation runs in one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        equipment::Equipment,
        loan::{EditLoanStatus, Loan, LoanDetails, LoanQuery, OpenLoan, ResolveLoan},
    },
    repository::{loans::NewLoan, Repository},
    services::field_error,
};

/// Result of a resolution; `remainder` is set when the loan was split
#[derive(Debug, Serialize, ToSchema)]
pub struct ResolveOutcome {
    pub resolved: LoanDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remainder: Option<LoanDetails>,
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

/// Local checks on an open request, as a field -> messages map
fn open_checks(status: LoanStatus, due_date: DateTime<Utc>, now: DateTime<Utc>) -> AppResult<()> {
    let mut errors = ValidationErrors::new();
    if !status.is_open() {
        errors.add(
            "status",
            field_error("open_status", "Initial status must be ON_LOAN, IN_USE or ISSUED"),
        );
    }
    if due_date <= now {
        errors.add("due_date", field_error("future_date", "Due date must be in the future"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

/// Preconditions on a resolve request against the loan's current state
fn resolve_checks(loan: &Loan, req: &ResolveLoan, now: DateTime<Utc>) -> AppResult<()> {
    let current = loan.status();
    if current.is_terminal() {
        return Err(AppError::InvalidState(format!(
            "Loan {} is already resolved",
            loan.id
        )));
    }
    if current == LoanStatus::Issued {
        return Err(AppError::InvalidState(
            "Permanently issued loans cannot be resolved".to_string(),
        ));
    }
    if !req.status.is_terminal() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "status",
            field_error("terminal_status", "Resolution status must be RETURNED, DAMAGED or LOST"),
        );
        return Err(errors.into());
    }
    if req.quantity > loan.quantity {
        return Err(AppError::InvalidState(format!(
            "Resolved quantity {} exceeds loan quantity {}",
            req.quantity, loan.quantity
        )));
    }

    let mut errors = ValidationErrors::new();
    if req.resolution_date > now {
        errors.add(
            "resolution_date",
            field_error("past_date", "Resolution date cannot be in the future"),
        );
    }
    if req.resolution_date < loan.loan_date {
        errors.add(
            "resolution_date",
            field_error("after_loan_date", "Resolution date cannot be before the loan date"),
        );
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

/// Expiry is checked only when opening a loan, never at resolution
fn is_expired(equipment: &Equipment, today: NaiveDate) -> bool {
    equipment.expiry_date.map(|d| d < today).unwrap_or(false)
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Open a loan: reserve stock (per the status capability table) and
    /// create the loan record in one transaction.
    pub async fn open_loan(&self, req: &OpenLoan) -> AppResult<LoanDetails> {
        req.validate()?;

        let status = req.status.unwrap_or(LoanStatus::OnLoan);
        let now = Utc::now();
        open_checks(status, req.due_date, now)?;

        let employee = self.repository.employees.get_by_id(req.employee_id).await?;
        if !employee.active {
            return Err(AppError::Referential(format!(
                "Employee {} is not active",
                employee.name
            )));
        }

        let equipment = self.repository.equipment.get_by_id(req.equipment_id).await?;
        if status.stock().consumes_on_open && is_expired(&equipment, now.date_naive()) {
            return Err(AppError::EquipmentExpired(format!(
                "Equipment {} is past its expiry date",
                equipment.name
            )));
        }

        let mut tx = self.repository.pool.begin().await?;
        if status.stock().consumes_on_open {
            self.repository
                .equipment
                .reserve_stock(&mut tx, equipment.id, req.quantity)
                .await?;
        }
        let loan = self
            .repository
            .loans
            .insert(
                &mut tx,
                &NewLoan {
                    employee_id: employee.id,
                    equipment_id: equipment.id,
                    quantity: req.quantity,
                    loan_date: now,
                    due_date: req.due_date,
                    status,
                    note: req.note.clone(),
                },
            )
            .await?;
        tx.commit().await?;

        tracing::info!(loan_id = loan.id, employee_id = employee.id, equipment_id = equipment.id,
            quantity = req.quantity, "loan opened");

        self.repository.loans.get_details(loan.id).await
    }

    /// Resolve a loan, fully or partially.
    ///
    /// A partial resolution shrinks the loan to the resolved quantity,
    /// transitions it, and creates a sibling loan carrying the remainder in
    /// the original open status with the original dates.
    pub async fn resolve_loan(&self, loan_id: i32, req: &ResolveLoan) -> AppResult<ResolveOutcome> {
        req.validate()?;

        let loan = self.repository.loans.get_by_id(loan_id).await?;
        let now = Utc::now();
        resolve_checks(&loan, req, now)?;

        let mut tx = self.repository.pool.begin().await?;
        if req.status.stock().credits_on_resolve {
            self.repository
                .equipment
                .release_stock(&mut tx, loan.equipment_id, req.quantity)
                .await?;
        }

        let remainder_id = if req.quantity == loan.quantity {
            self.repository
                .loans
                .transition(
                    &mut tx,
                    loan.id,
                    req.status,
                    Some(req.resolution_date),
                    req.resolution_note.as_deref(),
                )
                .await?;
            None
        } else {
            self.repository
                .loans
                .shrink_and_transition(
                    &mut tx,
                    loan.id,
                    req.quantity,
                    req.status,
                    req.resolution_date,
                    req.resolution_note.as_deref(),
                )
                .await?;
            let sibling = self
                .repository
                .loans
                .insert(
                    &mut tx,
                    &NewLoan {
                        employee_id: loan.employee_id,
                        equipment_id: loan.equipment_id,
                        quantity: loan.quantity - req.quantity,
                        loan_date: loan.loan_date,
                        due_date: loan.due_date,
                        status: loan.status(),
                        note: None,
                    },
                )
                .await?;
            Some(sibling.id)
        };
        tx.commit().await?;

        tracing::info!(loan_id = loan.id, status = %req.status, quantity = req.quantity,
            split = remainder_id.is_some(), "loan resolved");

        let resolved = self.repository.loans.get_details(loan.id).await?;
        let remainder = match remainder_id {
            Some(id) => Some(self.repository.loans.get_details(id).await?),
            None => None,
        };
        Ok(ResolveOutcome { resolved, remainder })
    }

    /// Administrative status edit between open statuses; never touches stock
    pub async fn edit_status(&self, loan_id: i32, req: &EditLoanStatus) -> AppResult<LoanDetails> {
        let loan = self.repository.loans.get_by_id(loan_id).await?;
        if !loan.status().can_edit_to(req.status) {
            return Err(AppError::InvalidState(format!(
                "Cannot change loan {} from {} to {}",
                loan.id,
                loan.status(),
                req.status
            )));
        }

        let mut tx = self.repository.pool.begin().await?;
        self.repository
            .loans
            .transition(&mut tx, loan.id, req.status, None, None)
            .await?;
        tx.commit().await?;

        self.repository.loans.get_details(loan.id).await
    }

    /// Get one loan with details
    pub async fn get(&self, loan_id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(loan_id).await
    }

    /// List loans with optional filters
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list(query).await
    }

    /// Get loans for an employee
    pub async fn list_by_employee(&self, employee_id: i32) -> AppResult<Vec<LoanDetails>> {
        // Verify employee exists
        self.repository.employees.get_by_id(employee_id).await?;
        self.repository.loans.list_by_employee(employee_id).await
    }

    /// Get loans against an equipment type
    pub async fn list_by_equipment(&self, equipment_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.repository.equipment.get_by_id(equipment_id).await?;
        self.repository.loans.list_by_equipment(equipment_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn loan(status: LoanStatus, quantity: i32) -> Loan {
        let loan_date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Loan {
            id: 1,
            employee_id: 1,
            equipment_id: 1,
            quantity,
            loan_date,
            due_date: loan_date + chrono::Duration::days(30),
            resolution_date: None,
            status: status.into(),
            note: None,
            resolution_note: None,
            created_at: loan_date,
            updated_at: loan_date,
        }
    }

    fn resolve(status: LoanStatus, quantity: i32, resolution_date: DateTime<Utc>) -> ResolveLoan {
        ResolveLoan {
            status,
            quantity,
            resolution_date,
            resolution_note: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_open_checks_rejects_terminal_status() {
        let due = now() + chrono::Duration::days(7);
        assert!(open_checks(LoanStatus::OnLoan, due, now()).is_ok());
        assert!(open_checks(LoanStatus::Issued, due, now()).is_ok());
        assert!(open_checks(LoanStatus::Returned, due, now()).is_err());
    }

    #[test]
    fn test_open_checks_rejects_past_due_date() {
        let past = now() - chrono::Duration::days(1);
        assert!(open_checks(LoanStatus::OnLoan, past, now()).is_err());
        assert!(open_checks(LoanStatus::OnLoan, now(), now()).is_err());
    }

    #[test]
    fn test_resolve_checks_terminal_loan_is_immutable() {
        for status in [LoanStatus::Returned, LoanStatus::Damaged, LoanStatus::Lost] {
            let result = resolve_checks(&loan(status, 3), &resolve(LoanStatus::Returned, 3, now()), now());
            assert!(matches!(result, Err(AppError::InvalidState(_))));
        }
    }

    #[test]
    fn test_resolve_checks_issued_cannot_resolve() {
        let result = resolve_checks(&loan(LoanStatus::Issued, 3), &resolve(LoanStatus::Returned, 3, now()), now());
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[test]
    fn test_resolve_checks_quantity_over_balance() {
        let result = resolve_checks(&loan(LoanStatus::OnLoan, 3), &resolve(LoanStatus::Returned, 4, now()), now());
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[test]
    fn test_resolve_checks_target_must_be_terminal() {
        let result = resolve_checks(&loan(LoanStatus::OnLoan, 3), &resolve(LoanStatus::InUse, 3, now()), now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_resolve_checks_date_window() {
        let before_loan = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let future = now() + chrono::Duration::days(1);
        let l = loan(LoanStatus::OnLoan, 3);

        assert!(matches!(
            resolve_checks(&l, &resolve(LoanStatus::Returned, 3, before_loan), now()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            resolve_checks(&l, &resolve(LoanStatus::Returned, 3, future), now()),
            Err(AppError::Validation(_))
        ));
        assert!(resolve_checks(&l, &resolve(LoanStatus::Returned, 3, now()), now()).is_ok());
    }

    #[test]
    fn test_resolve_checks_partial_quantity_ok() {
        let result = resolve_checks(&loan(LoanStatus::InUse, 5), &resolve(LoanStatus::Damaged, 2, now()), now());
        assert!(result.is_ok());
    }

    #[test]
    fn test_is_expired() {
        let mut equipment = Equipment {
            id: 1,
            name: "Helmet".to_string(),
            category: "Head protection".to_string(),
            quantity: 5,
            min_quantity: 5,
            expiry_date: None,
            description: None,
            created_at: now(),
            updated_at: now(),
        };
        let today = now().date_naive();

        assert!(!is_expired(&equipment, today));
        equipment.expiry_date = Some(today);
        assert!(!is_expired(&equipment, today));
        equipment.expiry_date = Some(today - chrono::Duration::days(1));
        assert!(is_expired(&equipment, today));
    }
}
