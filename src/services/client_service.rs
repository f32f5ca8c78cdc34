// src/services/client_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, ProjectRepository, UserRepository},
    models::{
        auth::User,
        product::ApplyProductPayload,
        project::{Project, ProjectWithQuotes},
    },
    services::customer_service::attach_quotes,
};

#[derive(Clone)]
pub struct ClientService {
    product_repo: ProductRepository,
    project_repo: ProjectRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl ClientService {
    pub fn new(
        product_repo: ProductRepository,
        project_repo: ProjectRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self { product_repo, project_repo, user_repo, pool }
    }

    /// Cria um projeto PENDING e promove o cliente NORMAL, na mesma transação.
    pub async fn apply_for_product(
        &self,
        customer: &User,
        product_id: Uuid,
        payload: &ApplyProductPayload,
    ) -> Result<Project, AppError> {
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .filter(|p| !p.is_archived)
            .ok_or(AppError::ProductNotFound)?;

        let mut tx = self.pool.begin().await?;

        let project = self
            .project_repo
            .create_project(
                &mut *tx,
                customer.id,
                payload.title.trim(),
                payload.description.as_deref(),
                None,
            )
            .await?;

        let promoted = self.user_repo.promote_to_potential(&mut *tx, customer.id).await?;

        tx.commit().await?;

        tracing::info!(
            "🛒 Cliente {} pediu o produto {} (projeto {})",
            customer.id,
            product.id,
            project.id
        );
        if promoted {
            tracing::info!("⭐ Cliente {} promovido a POTENTIAL", customer.id);
        }
        Ok(project)
    }

    pub async fn my_applications(&self, customer: &User) -> Result<Vec<ProjectWithQuotes>, AppError> {
        let projects = self.project_repo.list_by_customer(customer.id).await?;
        let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let quotes = self.project_repo.list_quotes_for_projects(&ids).await?;
        Ok(attach_quotes(projects, quotes))
    }
}
