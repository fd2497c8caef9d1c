//! Business logic services

pub mod employees;
pub mod equipment;
pub mod loans;
pub mod stats;

use std::borrow::Cow;

use validator::ValidationError;

use crate::{config::InventoryConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub employees: employees::EmployeesService,
    pub equipment: equipment::EquipmentService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, inventory_config: InventoryConfig) -> Self {
        Self {
            employees: employees::EmployeesService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone(), inventory_config),
            loans: loans::LoansService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}

/// Build a single validator error with a fixed message
pub(crate) fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
