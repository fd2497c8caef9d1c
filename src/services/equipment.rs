//! Equipment catalog service

use chrono::Utc;
use validator::{Validate, ValidationErrors};

use crate::{
    config::InventoryConfig,
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, UpdateEquipment},
    repository::Repository,
    services::field_error,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    inventory_config: InventoryConfig,
}

impl EquipmentService {
    pub fn new(repository: Repository, inventory_config: InventoryConfig) -> Self {
        Self {
            repository,
            inventory_config,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;

        let normalized = CreateEquipment {
            name: data.name.trim().to_string(),
            category: data.category.trim().to_string(),
            quantity: data.quantity,
            min_quantity: data.min_quantity,
            expiry_date: data.expiry_date,
            description: data.description.as_deref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        };

        let mut errors = ValidationErrors::new();
        if self.repository.equipment.name_exists(&normalized.name, None).await? {
            errors.add(
                "name",
                field_error("unique", "Equipment with this name already exists"),
            );
        }
        if let Some(expiry) = normalized.expiry_date {
            if expiry < Utc::now().date_naive() {
                errors.add(
                    "expiry_date",
                    field_error("past_date", "Expiry date cannot be in the past"),
                );
            }
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        self.repository
            .equipment
            .create(&normalized, self.inventory_config.low_stock_threshold)
            .await
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;

        let normalized = UpdateEquipment {
            name: data.name.as_deref().map(|s| s.trim().to_string()),
            category: data.category.as_deref().map(|s| s.trim().to_string()),
            quantity: data.quantity,
            min_quantity: data.min_quantity,
            expiry_date: data.expiry_date,
            description: data.description.as_deref().map(|s| s.trim().to_string()),
        };

        if let Some(ref name) = normalized.name {
            if self.repository.equipment.name_exists(name, Some(id)).await? {
                let mut errors = ValidationErrors::new();
                errors.add(
                    "name",
                    field_error("unique", "Other equipment with this name already exists"),
                );
                return Err(errors.into());
            }
        }

        self.repository.equipment.update(id, &normalized).await
    }

    /// Hard-delete equipment; blocked while any loan against it is open
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let open_loans = self.repository.loans.count_open_by_equipment(id).await?;
        if open_loans > 0 {
            return Err(AppError::ConflictingDeletion(format!(
                "Equipment {} still has {} open loan(s)",
                id, open_loans
            )));
        }
        self.repository.equipment.delete(id).await
    }

    /// Equipment below its low-stock threshold
    pub async fn list_low_stock(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list_low_stock().await
    }
}
