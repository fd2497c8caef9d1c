//! Statistics service
//!
//! Read-only aggregates for dashboards and report export.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::{
    api::stats::{
        EmployeeStats, EquipmentStats, LoanStats, LoanStatsResponse, StatEntry, StatsResponse,
        TimeSeriesEntry,
    },
    error::AppResult,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Overview counts for the dashboard
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let total_loans = self.repository.loans.count_all().await?;
        let open_loans = self.repository.loans.count_open().await?;
        let overdue_loans = self.repository.loans.count_overdue().await?;
        let by_status = self
            .repository
            .loans
            .count_by_status()
            .await?
            .into_iter()
            .map(|(status, count)| StatEntry {
                label: status.to_string(),
                value: count,
            })
            .collect();

        let total_employees = self.repository.employees.count_all().await?;
        let active_employees = self.repository.employees.count_active().await?;

        let total_equipment = self.repository.equipment.count_all().await?;
        let low_stock = self.repository.equipment.count_low_stock().await?;

        Ok(StatsResponse {
            loans: LoanStats {
                total: total_loans,
                open: open_loans,
                overdue: overdue_loans,
                by_status,
            },
            employees: EmployeeStats {
                total: total_employees,
                active: active_employees,
            },
            equipment: EquipmentStats {
                total: total_equipment,
                low_stock,
            },
        })
    }

    /// Loan activity over a date range: monthly time series plus top
    /// equipment, top employees and category breakdown.
    pub async fn get_loan_stats(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<LoanStatsResponse> {
        let pool = &self.repository.pool;

        // Default date range: last 6 months
        let start = start_date.unwrap_or_else(|| Utc::now() - chrono::Duration::days(182));
        let end = end_date.unwrap_or_else(Utc::now);

        let opened_rows = sqlx::query(
            r#"
            SELECT TO_CHAR(DATE_TRUNC('month', loan_date), 'YYYY-MM') as period,
                   COUNT(*) as count
            FROM loans
            WHERE loan_date >= $1 AND loan_date <= $2
            GROUP BY period
            ORDER BY period
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        let resolved_rows = sqlx::query(
            r#"
            SELECT TO_CHAR(DATE_TRUNC('month', resolution_date), 'YYYY-MM') as period,
                   COUNT(*) as count
            FROM loans
            WHERE resolution_date IS NOT NULL
              AND resolution_date >= $1 AND resolution_date <= $2
            GROUP BY period
            ORDER BY period
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        // Combine opened and resolved counts by period
        let mut period_map: HashMap<String, (i64, i64)> = HashMap::new();
        for row in opened_rows {
            let period: String = row.get("period");
            period_map.entry(period).or_insert((0, 0)).0 += row.get::<i64, _>("count");
        }
        for row in resolved_rows {
            let period: String = row.get("period");
            period_map.entry(period).or_insert((0, 0)).1 += row.get::<i64, _>("count");
        }

        let mut time_series: Vec<TimeSeriesEntry> = period_map
            .into_iter()
            .map(|(period, (loans, resolutions))| TimeSeriesEntry {
                period,
                loans,
                resolutions,
            })
            .collect();
        time_series.sort_by_key(|e| e.period.clone());

        let total_loans: i64 = time_series.iter().map(|e| e.loans).sum();
        let total_resolutions: i64 = time_series.iter().map(|e| e.resolutions).sum();

        let top_equipment = sqlx::query(
            r#"
            SELECT eq.name as label, COUNT(*) as value
            FROM loans l
            JOIN equipment eq ON l.equipment_id = eq.id
            WHERE l.loan_date >= $1 AND l.loan_date <= $2
            GROUP BY eq.name
            ORDER BY value DESC
            LIMIT 8
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| StatEntry {
            label: row.get("label"),
            value: row.get("value"),
        })
        .collect();

        let top_employees = sqlx::query(
            r#"
            SELECT emp.name as label, COUNT(*) as value
            FROM loans l
            JOIN employees emp ON l.employee_id = emp.id
            WHERE emp.active = TRUE
              AND l.loan_date >= $1 AND l.loan_date <= $2
            GROUP BY emp.name
            ORDER BY value DESC
            LIMIT 8
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| StatEntry {
            label: row.get("label"),
            value: row.get("value"),
        })
        .collect();

        let by_category = sqlx::query(
            r#"
            SELECT eq.category as label, COUNT(*) as value
            FROM loans l
            JOIN equipment eq ON l.equipment_id = eq.id
            WHERE l.loan_date >= $1 AND l.loan_date <= $2
            GROUP BY eq.category
            ORDER BY value DESC
            LIMIT 6
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| StatEntry {
            label: row.get("label"),
            value: row.get("value"),
        })
        .collect();

        Ok(LoanStatsResponse {
            total_loans,
            total_resolutions,
            time_series,
            top_equipment,
            top_employees,
            by_category,
        })
    }
}
