//! Employee management service

use validator::{Validate, ValidationErrors};

use crate::{
    error::{AppError, AppResult},
    models::employee::{CreateEmployee, Employee, UpdateEmployee},
    repository::Repository,
    services::field_error,
};

#[derive(Clone)]
pub struct EmployeesService {
    repository: Repository,
}

impl EmployeesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Employee>> {
        self.repository.employees.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Employee> {
        self.repository.employees.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEmployee) -> AppResult<Employee> {
        data.validate()?;

        let normalized = CreateEmployee {
            name: data.name.trim().to_string(),
            email: data.email.trim().to_lowercase(),
            badge_number: data.badge_number.trim().to_string(),
            role: data.role.trim().to_string(),
            active: data.active,
        };

        let mut errors = ValidationErrors::new();
        if self.repository.employees.email_exists(&normalized.email, None).await? {
            errors.add(
                "email",
                field_error("unique", "An employee with this email already exists"),
            );
        }
        if self
            .repository
            .employees
            .badge_number_exists(&normalized.badge_number, None)
            .await?
        {
            errors.add(
                "badge_number",
                field_error("unique", "An employee with this badge number already exists"),
            );
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        self.repository.employees.create(&normalized).await
    }

    pub async fn update(&self, id: i32, data: &UpdateEmployee) -> AppResult<Employee> {
        data.validate()?;

        let normalized = UpdateEmployee {
            name: data.name.as_deref().map(|s| s.trim().to_string()),
            email: data.email.as_deref().map(|s| s.trim().to_lowercase()),
            badge_number: data.badge_number.as_deref().map(|s| s.trim().to_string()),
            role: data.role.as_deref().map(|s| s.trim().to_string()),
            active: data.active,
        };

        let mut errors = ValidationErrors::new();
        if let Some(ref email) = normalized.email {
            if self.repository.employees.email_exists(email, Some(id)).await? {
                errors.add(
                    "email",
                    field_error("unique", "Another employee with this email already exists"),
                );
            }
        }
        if let Some(ref badge_number) = normalized.badge_number {
            if self
                .repository
                .employees
                .badge_number_exists(badge_number, Some(id))
                .await?
            {
                errors.add(
                    "badge_number",
                    field_error("unique", "Another employee with this badge number already exists"),
                );
            }
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        self.repository.employees.update(id, &normalized).await
    }

    /// Hard-delete an employee; blocked while any of their loans is open.
    /// Soft-disabling via `update` with `active: false` is always allowed.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let open_loans = self.repository.loans.count_open_by_employee(id).await?;
        if open_loans > 0 {
            return Err(AppError::ConflictingDeletion(format!(
                "Employee {} still has {} open loan(s)",
                id, open_loans
            )));
        }
        self.repository.employees.delete(id).await
    }
}
