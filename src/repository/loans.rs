//! Loans repository for database operations
//!
//! Thin persistence contract over the loans table. Mutations take the
//! caller's open transaction so loan and stock changes commit together;
//! business rules live in the loans service.

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        loan::{Loan, LoanDetails, LoanQuery},
    },
};

/// Row values for a loan insert
pub struct NewLoan {
    pub employee_id: i32,
    pub equipment_id: i32,
    pub quantity: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub status: LoanStatus,
    pub note: Option<String>,
}

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

const DETAILS_SELECT: &str = r#"
    SELECT l.*, emp.name as employee_name, emp.badge_number,
           eq.name as equipment_name, eq.category
    FROM loans l
    JOIN employees emp ON l.employee_id = emp.id
    JOIN equipment eq ON l.equipment_id = eq.id
"#;

fn map_details_row(row: &PgRow, now: DateTime<Utc>) -> LoanDetails {
    let status = LoanStatus::from(row.get::<i16, _>("status"));
    let due_date: DateTime<Utc> = row.get("due_date");
    LoanDetails {
        id: row.get("id"),
        employee_id: row.get("employee_id"),
        employee_name: row.get("employee_name"),
        badge_number: row.get("badge_number"),
        equipment_id: row.get("equipment_id"),
        equipment_name: row.get("equipment_name"),
        category: row.get("category"),
        quantity: row.get("quantity"),
        loan_date: row.get("loan_date"),
        due_date,
        resolution_date: row.get("resolution_date"),
        status,
        note: row.get("note"),
        resolution_note: row.get("resolution_note"),
        is_overdue: status.is_open() && due_date < now,
    }
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get loan with joined details by ID
    pub async fn get_details(&self, id: i32) -> AppResult<LoanDetails> {
        let sql = format!("{} WHERE l.id = $1", DETAILS_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;
        Ok(map_details_row(&row, Utc::now()))
    }

    /// List loans with optional filters
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<LoanDetails>> {
        let mut conditions = Vec::new();
        let mut idx = 0;

        if query.employee_id.is_some() {
            idx += 1;
            conditions.push(format!("l.employee_id = ${}", idx));
        }
        if query.equipment_id.is_some() {
            idx += 1;
            conditions.push(format!("l.equipment_id = ${}", idx));
        }
        if query.status.is_some() {
            idx += 1;
            conditions.push(format!("l.status = ${}", idx));
        }
        if query.overdue == Some(true) {
            // open statuses past their due date
            conditions.push("l.status IN (0, 1, 2) AND l.due_date < NOW()".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "{} {} ORDER BY l.loan_date DESC, l.id DESC",
            DETAILS_SELECT, where_clause
        );

        let mut builder = sqlx::query(&sql);
        if let Some(employee_id) = query.employee_id {
            builder = builder.bind(employee_id);
        }
        if let Some(equipment_id) = query.equipment_id {
            builder = builder.bind(equipment_id);
        }
        if let Some(status) = query.status {
            builder = builder.bind(i16::from(status));
        }

        let rows = builder.fetch_all(&self.pool).await?;
        let now = Utc::now();
        Ok(rows.iter().map(|row| map_details_row(row, now)).collect())
    }

    /// Get loans for an employee
    pub async fn list_by_employee(&self, employee_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.list(&LoanQuery {
            employee_id: Some(employee_id),
            ..Default::default()
        })
        .await
    }

    /// Get loans against an equipment type
    pub async fn list_by_equipment(&self, equipment_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.list(&LoanQuery {
            equipment_id: Some(equipment_id),
            ..Default::default()
        })
        .await
    }

    /// Create a new loan inside the caller's transaction
    pub async fn insert(&self, tx: &mut Transaction<'_, Postgres>, loan: &NewLoan) -> AppResult<Loan> {
        let row = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (employee_id, equipment_id, quantity, loan_date, due_date, status, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(loan.employee_id)
        .bind(loan.equipment_id)
        .bind(loan.quantity)
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .bind(i16::from(loan.status))
        .bind(&loan.note)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }

    /// Update status and resolution metadata inside the caller's transaction.
    ///
    /// Guarded on the loan still being open, so two racing resolutions of
    /// the same loan cannot both apply.
    pub async fn transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        loan_id: i32,
        status: LoanStatus,
        resolution_date: Option<DateTime<Utc>>,
        resolution_note: Option<&str>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET status = $2, resolution_date = $3, resolution_note = $4, updated_at = NOW()
            WHERE id = $1 AND status IN (0, 1, 2)
            "#,
        )
        .bind(loan_id)
        .bind(i16::from(status))
        .bind(resolution_date)
        .bind(resolution_note)
        .execute(&mut **tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::InvalidState(format!(
                "Loan {} is no longer open",
                loan_id
            )));
        }
        Ok(())
    }

    /// Shrink a loan to its resolved quantity and transition it, for a
    /// partial resolution; the remainder is inserted as a sibling loan.
    pub async fn shrink_and_transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        loan_id: i32,
        quantity: i32,
        status: LoanStatus,
        resolution_date: DateTime<Utc>,
        resolution_note: Option<&str>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET quantity = $2, status = $3, resolution_date = $4, resolution_note = $5,
                updated_at = NOW()
            WHERE id = $1 AND status IN (0, 1, 2)
            "#,
        )
        .bind(loan_id)
        .bind(quantity)
        .bind(i16::from(status))
        .bind(resolution_date)
        .bind(resolution_note)
        .execute(&mut **tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::InvalidState(format!(
                "Loan {} is no longer open",
                loan_id
            )));
        }
        Ok(())
    }

    /// Count loans per status
    pub async fn count_by_status(&self) -> AppResult<Vec<(LoanStatus, i64)>> {
        let rows = sqlx::query("SELECT status, COUNT(*) as count FROM loans GROUP BY status ORDER BY status")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (LoanStatus::from(row.get::<i16, _>("status")), row.get::<i64, _>("count")))
            .collect())
    }

    /// Count open loans held by an employee (deletion guard)
    pub async fn count_open_by_employee(&self, employee_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE employee_id = $1 AND status IN (0, 1, 2)",
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count open loans against an equipment type (deletion guard)
    pub async fn count_open_by_equipment(&self, equipment_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE equipment_id = $1 AND status IN (0, 1, 2)",
        )
        .bind(equipment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count all loans
    pub async fn count_all(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count open loans
    pub async fn count_open(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status IN (0, 1, 2)")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count overdue loans (open, past due date)
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE status IN (0, 1, 2) AND due_date < NOW()",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
