//! Equipment repository and the inventory ledger

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, UpdateEquipment},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all equipment
    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment with id {} not found", id)))
    }

    /// Create equipment
    pub async fn create(&self, data: &CreateEquipment, default_min_quantity: i32) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (name, category, quantity, min_quantity, expiry_date, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.category)
        .bind(data.quantity)
        .bind(data.min_quantity.unwrap_or(default_min_quantity))
        .bind(data.expiry_date)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update equipment; absent fields keep their current value
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                quantity = COALESCE($4, quantity),
                min_quantity = COALESCE($5, min_quantity),
                expiry_date = COALESCE($6, expiry_date),
                description = COALESCE($7, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.category)
        .bind(data.quantity)
        .bind(data.min_quantity)
        .bind(data.expiry_date)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment with id {} not found", id)))
    }

    /// Delete equipment (the service checks the open-loan guard first)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment with id {} not found", id)));
        }
        Ok(())
    }

    /// Check if equipment name already exists (case-insensitive)
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM equipment WHERE LOWER(name) = LOWER($1) AND id != $2)",
            )
            .bind(name)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM equipment WHERE LOWER(name) = LOWER($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Reserve units from inventory inside the caller's transaction.
    ///
    /// The decrement is conditional on sufficient availability, so concurrent
    /// reservations against the same equipment row serialize on the row lock
    /// and the quantity can never go negative.
    pub async fn reserve_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment_id: i32,
        quantity: i32,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE equipment SET quantity = quantity - $2, updated_at = NOW() WHERE id = $1 AND quantity >= $2",
        )
        .bind(equipment_id)
        .bind(quantity)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            let available: Option<i32> =
                sqlx::query_scalar("SELECT quantity FROM equipment WHERE id = $1")
                    .bind(equipment_id)
                    .fetch_optional(&mut **tx)
                    .await?;
            return match available {
                Some(available) => Err(AppError::InsufficientStock { available }),
                None => Err(AppError::NotFound(format!(
                    "Equipment with id {} not found",
                    equipment_id
                ))),
            };
        }
        Ok(())
    }

    /// Credit units back to inventory inside the caller's transaction.
    /// Returns can always be credited; there is no upper bound.
    pub async fn release_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        equipment_id: i32,
        quantity: i32,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE equipment SET quantity = quantity + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(equipment_id)
        .bind(quantity)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Equipment with id {} not found",
                equipment_id
            )));
        }
        Ok(())
    }

    /// List equipment below its own low-stock threshold
    pub async fn list_low_stock(&self) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(
            "SELECT * FROM equipment WHERE quantity < min_quantity ORDER BY quantity, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Count equipment below its low-stock threshold (for stats)
    pub async fn count_low_stock(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM equipment WHERE quantity < min_quantity")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count all equipment (for stats)
    pub async fn count_all(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
