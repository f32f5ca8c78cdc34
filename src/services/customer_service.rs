// src/services/customer_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, ProjectRepository, UserRepository},
    models::{
        auth::{CustomerType, NewUser, Role, User},
        customer::{
            ContactPayload, CreateCustomerPayload, CustomerContact, CustomerDetail, CustomerFilter,
            CustomerSummary, Tag, TagPayload, UpdateCustomerPayload,
        },
        project::{Project, ProjectWithQuotes, Quote},
    },
    services::auth::hash_password,
};

/// Junta cada projeto aos seus orçamentos (mais recentes primeiro).
pub fn attach_quotes(projects: Vec<Project>, quotes: Vec<Quote>) -> Vec<ProjectWithQuotes> {
    let mut by_project: HashMap<Uuid, Vec<Quote>> = HashMap::new();
    for quote in quotes {
        by_project.entry(quote.project_id).or_default().push(quote);
    }
    projects
        .into_iter()
        .map(|project| {
            let quotes = by_project.remove(&project.id).unwrap_or_default();
            ProjectWithQuotes { project, quotes }
        })
        .collect()
}

#[derive(Clone)]
pub struct CustomerService {
    user_repo: UserRepository,
    customer_repo: CustomerRepository,
    project_repo: ProjectRepository,
    pool: PgPool,
}

impl CustomerService {
    pub fn new(
        user_repo: UserRepository,
        customer_repo: CustomerRepository,
        project_repo: ProjectRepository,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, customer_repo, project_repo, pool }
    }

    async fn require_customer(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_with_role(id, Role::Customer)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn list_customers(&self, filter: &CustomerFilter) -> Result<Vec<CustomerSummary>, AppError> {
        let rows = self.customer_repo.list_customers(filter).await?;
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let mut tags_by_customer: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in self.customer_repo.tags_for_customers(&ids).await? {
            tags_by_customer.entry(row.customer_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = tags_by_customer.remove(&row.id).unwrap_or_default();
                CustomerSummary::from_row(row, tags)
            })
            .collect())
    }

    pub async fn get_customer_detail(&self, id: Uuid) -> Result<CustomerDetail, AppError> {
        let customer = self.require_customer(id).await?;
        let contact = self.customer_repo.find_contact(id).await?;
        let tags = self.customer_repo.tags_of(id).await?;

        let projects = self.project_repo.list_by_customer(id).await?;
        let project_ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let quotes = self.project_repo.list_quotes_for_projects(&project_ids).await?;

        Ok(CustomerDetail {
            customer,
            contact,
            tags,
            projects: attach_quotes(projects, quotes),
        })
    }

    pub async fn create_customer(&self, payload: &CreateCustomerPayload) -> Result<User, AppError> {
        let hashed_password = hash_password(&payload.password).await?;
        let customer = self
            .user_repo
            .create_user(
                &self.pool,
                &NewUser {
                    name: payload.name.trim(),
                    email: Some(payload.email.trim()),
                    phone: None,
                    password_hash: Some(&hashed_password),
                    image: None,
                    role: Role::Customer,
                    customer_type: Some(payload.customer_type.unwrap_or(CustomerType::Normal)),
                },
            )
            .await?;
        tracing::info!("👤 Cliente criado pelo admin: {}", customer.id);
        Ok(customer)
    }

    pub async fn update_customer(&self, id: Uuid, payload: &UpdateCustomerPayload) -> Result<User, AppError> {
        self.user_repo
            .update_customer(id, payload.name.trim(), payload.email.trim(), payload.customer_type)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    /// Projetos, contatos, etiquetas e conversas caem em cascata.
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), AppError> {
        if !self.user_repo.delete_with_role(&self.pool, id, Role::Customer).await? {
            return Err(AppError::CustomerNotFound);
        }
        tracing::info!("🗑️ Cliente removido: {}", id);
        Ok(())
    }

    pub async fn bulk_delete(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let deleted = self.user_repo.delete_customers(ids).await?;
        tracing::info!("🗑️ {} clientes removidos em lote", deleted);
        Ok(deleted)
    }

    /// Define o tipo explicitamente; repetir a mesma chamada não muda nada.
    pub async fn set_customer_type(&self, id: Uuid, customer_type: CustomerType) -> Result<User, AppError> {
        let user = self
            .user_repo
            .set_customer_type(&self.pool, id, customer_type)
            .await?
            .ok_or(AppError::CustomerNotFound)?;
        tracing::info!("🏷️ Cliente {} agora é {:?}", id, customer_type);
        Ok(user)
    }

    // =========================================================================
    //  CARTÃO DE CONTATO
    // =========================================================================

    pub async fn save_contact(&self, customer_id: Uuid, payload: ContactPayload) -> Result<CustomerContact, AppError> {
        self.require_customer(customer_id).await?;
        self.customer_repo.upsert_contact(customer_id, &payload.normalized()).await
    }

    pub async fn delete_contact(&self, customer_id: Uuid) -> Result<(), AppError> {
        if !self.customer_repo.delete_contact(customer_id).await? {
            return Err(AppError::ContactNotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  ETIQUETAS
    // =========================================================================

    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.customer_repo.list_tags().await
    }

    pub async fn create_tag(&self, payload: &TagPayload) -> Result<Tag, AppError> {
        self.customer_repo
            .create_tag(payload.name.trim(), payload.color.as_deref())
            .await
    }

    pub async fn update_tag(&self, id: Uuid, payload: &TagPayload) -> Result<Tag, AppError> {
        self.customer_repo
            .update_tag(id, payload.name.trim(), payload.color.as_deref())
            .await?
            .ok_or(AppError::TagNotFound)
    }

    pub async fn delete_tag(&self, id: Uuid) -> Result<(), AppError> {
        if !self.customer_repo.delete_tag(id).await? {
            return Err(AppError::TagNotFound);
        }
        Ok(())
    }

    pub async fn add_tag(&self, customer_id: Uuid, tag_id: Uuid) -> Result<Vec<Tag>, AppError> {
        self.require_customer(customer_id).await?;
        if !self.customer_repo.tag_exists(tag_id).await? {
            return Err(AppError::TagNotFound);
        }
        self.customer_repo.add_tag_to_customer(customer_id, tag_id).await?;
        self.customer_repo.tags_of(customer_id).await
    }

    pub async fn remove_tag(&self, customer_id: Uuid, tag_id: Uuid) -> Result<(), AppError> {
        if !self.customer_repo.remove_tag_from_customer(customer_id, tag_id).await? {
            return Err(AppError::TagNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::models::project::ProjectStatus;

    fn project(id: Uuid) -> Project {
        let now = Utc::now();
        Project {
            id,
            title: "Rótulos".into(),
            description: None,
            status: ProjectStatus::Pending,
            customer_id: Uuid::new_v4(),
            assigned_employee_id: None,
            deadline: None,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn quote(project_id: Uuid, cents: i64) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            project_id,
            amount: Decimal::new(cents, 2),
            details: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn quotes_are_grouped_under_their_project() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let grouped = attach_quotes(
            vec![project(a), project(b)],
            vec![quote(a, 1000), quote(a, 2500), quote(Uuid::new_v4(), 1)],
        );
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].quotes.len(), 2);
        assert!(grouped[1].quotes.is_empty());
    }
}
