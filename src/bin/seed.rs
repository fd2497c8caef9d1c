//! Demo data seeder
//!
//! Populates employees, equipment and historical loans directly through the
//! database, bypassing the lifecycle rules. For demo and test environments
//! only; wipes existing data first.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use epi_server::config::AppConfig;
use epi_server::models::LoanStatus;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter("seed=info,sqlx=warn")
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Clearing existing data");
    sqlx::query("DELETE FROM loans").execute(&pool).await?;
    sqlx::query("DELETE FROM equipment").execute(&pool).await?;
    sqlx::query("DELETE FROM employees").execute(&pool).await?;

    let employees = seed_employees(&pool).await?;
    let equipment = seed_equipment(&pool).await?;
    seed_loans(&pool, &employees, &equipment).await?;

    tracing::info!("Seed completed");
    Ok(())
}

async fn seed_employees(pool: &Pool<Postgres>) -> Result<Vec<i32>> {
    let rows: &[(&str, &str, &str, &str, bool)] = &[
        ("Carlos Silva", "carlos.silva@example.com", "EMP-0001", "Welder", true),
        ("Ana Souza", "ana.souza@example.com", "EMP-0002", "Electrician", true),
        ("Pedro Santos", "pedro.santos@example.com", "EMP-0003", "Machine Operator", true),
        ("Maria Oliveira", "maria.oliveira@example.com", "EMP-0004", "Safety Technician", true),
        ("Lucas Pereira", "lucas.pereira@example.com", "EMP-0005", "Warehouse Assistant", true),
        ("Julia Costa", "julia.costa@example.com", "EMP-0006", "Painter", false),
    ];

    let mut ids = Vec::with_capacity(rows.len());
    for (name, email, badge_number, role, active) in rows {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO employees (name, email, badge_number, role, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(badge_number)
        .bind(role)
        .bind(active)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }
    tracing::info!(count = ids.len(), "Employees seeded");
    Ok(ids)
}

async fn seed_equipment(pool: &Pool<Postgres>) -> Result<Vec<i32>> {
    let next_year = (Utc::now() + Duration::days(365)).date_naive();
    let rows: &[(&str, &str, i32, i32)] = &[
        ("Safety Helmet", "Head protection", 25, 5),
        ("Ear Muffs", "Hearing protection", 18, 5),
        ("Half-Face Respirator", "Respiratory protection", 12, 4),
        ("Cut-Resistant Gloves", "Hand protection", 40, 10),
        ("Steel-Toe Boots", "Foot protection", 15, 5),
        ("Safety Goggles", "Eye protection", 30, 8),
        ("Welding Mask", "Face protection", 6, 3),
        ("Fall-Arrest Harness", "Fall protection", 4, 2),
    ];

    let mut ids = Vec::with_capacity(rows.len());
    for (name, category, quantity, min_quantity) in rows {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO equipment (name, category, quantity, min_quantity, expiry_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(quantity)
        .bind(min_quantity)
        .bind(next_year)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }
    tracing::info!(count = ids.len(), "Equipment seeded");
    Ok(ids)
}

async fn seed_loans(pool: &Pool<Postgres>, employees: &[i32], equipment: &[i32]) -> Result<()> {
    let now = Utc::now();

    // (employee idx, equipment idx, qty, opened days ago, due in days from open,
    //  status, resolved days ago)
    let rows: &[(usize, usize, i32, i64, i64, LoanStatus, Option<i64>)] = &[
        // open loans
        (0, 0, 1, 10, 30, LoanStatus::OnLoan, None),
        (1, 3, 2, 5, 15, LoanStatus::OnLoan, None),
        (2, 1, 1, 20, 30, LoanStatus::InUse, None),
        (3, 5, 1, 3, 45, LoanStatus::InUse, None),
        (4, 4, 1, 60, 30, LoanStatus::OnLoan, None), // overdue
        // permanent issues
        (0, 5, 1, 90, 30, LoanStatus::Issued, None),
        (2, 3, 2, 45, 30, LoanStatus::Issued, None),
        // resolved history
        (1, 0, 1, 120, 30, LoanStatus::Returned, Some(95)),
        (3, 2, 1, 100, 30, LoanStatus::Returned, Some(75)),
        (4, 1, 2, 80, 30, LoanStatus::Returned, Some(55)),
        (0, 6, 1, 70, 30, LoanStatus::Damaged, Some(42)),
        (2, 4, 1, 150, 30, LoanStatus::Lost, Some(110)),
        (5, 3, 3, 140, 30, LoanStatus::Returned, Some(115)),
    ];

    for (emp, eq, qty, opened, due, status, resolved) in rows {
        let loan_date = now - Duration::days(*opened);
        let due_date = loan_date + Duration::days(*due);
        let resolution_date: Option<DateTime<Utc>> = resolved.map(|d| now - Duration::days(d));
        sqlx::query(
            r#"
            INSERT INTO loans (employee_id, equipment_id, quantity, loan_date, due_date,
                               resolution_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(employees[*emp])
        .bind(equipment[*eq])
        .bind(qty)
        .bind(loan_date)
        .bind(due_date)
        .bind(resolution_date)
        .bind(i16::from(*status))
        .execute(pool)
        .await?;
    }
    tracing::info!(count = rows.len(), "Loans seeded");
    Ok(())
}
