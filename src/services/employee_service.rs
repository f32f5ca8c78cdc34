// src/services/employee_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProjectRepository, UserRepository},
    models::{
        auth::{NewUser, Role, User},
        employee::{CreateEmployeePayload, EmployeeSummary, UpdateEmployeePayload},
    },
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct EmployeeService {
    user_repo: UserRepository,
    project_repo: ProjectRepository,
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(user_repo: UserRepository, project_repo: ProjectRepository, pool: PgPool) -> Self {
        Self { user_repo, project_repo, pool }
    }

    pub async fn list_employees(&self) -> Result<Vec<EmployeeSummary>, AppError> {
        self.user_repo.list_employees().await
    }

    pub async fn create_employee(&self, payload: &CreateEmployeePayload) -> Result<User, AppError> {
        let hashed_password = hash_password(&payload.password).await?;
        let employee = self
            .user_repo
            .create_user(
                &self.pool,
                &NewUser {
                    name: payload.name.trim(),
                    email: Some(payload.email.trim()),
                    phone: None,
                    password_hash: Some(&hashed_password),
                    image: None,
                    role: Role::Employee,
                    customer_type: None,
                },
            )
            .await?;
        tracing::info!("🧑‍💼 Funcionário criado: {}", employee.id);
        Ok(employee)
    }

    pub async fn update_employee(&self, id: Uuid, payload: &UpdateEmployeePayload) -> Result<User, AppError> {
        let new_hash = match payload.new_password() {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        self.user_repo
            .update_employee(id, payload.name.trim(), payload.email.trim(), new_hash.as_deref())
            .await?
            .ok_or(AppError::EmployeeNotFound)
    }

    /// Os projetos do funcionário voltam para PENDING, sem responsável.
    pub async fn delete_employee(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let released = self.project_repo.release_projects_of(&mut *tx, id).await?;
        if !self.user_repo.delete_with_role(&mut *tx, id, Role::Employee).await? {
            return Err(AppError::EmployeeNotFound);
        }

        tx.commit().await?;

        tracing::info!("🗑️ Funcionário removido: {} ({} projetos liberados)", id, released);
        Ok(())
    }
}
