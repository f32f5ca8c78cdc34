// src/services/project_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{field_error, AppError},
    db::{ConversationRepository, ProjectRepository, UserRepository},
    models::{
        auth::{Role, User},
        conversation::{assignment_notice, SenderRole},
        project::{
            can_toggle_completion, CreateProjectPayload, CreateQuotePayload, DisplayProject,
            Project, Quote, UpdateProjectPayload,
        },
    },
};

#[derive(Clone)]
pub struct ProjectService {
    project_repo: ProjectRepository,
    user_repo: UserRepository,
    conversation_repo: ConversationRepository,
    pool: PgPool,
}

impl ProjectService {
    pub fn new(
        project_repo: ProjectRepository,
        user_repo: UserRepository,
        conversation_repo: ConversationRepository,
        pool: PgPool,
    ) -> Self {
        Self { project_repo, user_repo, conversation_repo, pool }
    }

    async fn require_project(&self, id: Uuid) -> Result<Project, AppError> {
        self.project_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProjectNotFound)
    }

    pub async fn list_projects(&self) -> Result<Vec<DisplayProject>, AppError> {
        let rows = self.project_repo.list_display().await?;
        Ok(rows.into_iter().map(DisplayProject::from).collect())
    }

    /// Projeto criado pelo admin nasce PENDING, sem responsável.
    pub async fn create_project(&self, payload: &CreateProjectPayload) -> Result<Project, AppError> {
        self.user_repo
            .find_with_role(payload.customer_id, Role::Customer)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let project = self
            .project_repo
            .create_project(
                &self.pool,
                payload.customer_id,
                payload.title.trim(),
                payload.description.as_deref(),
                None,
            )
            .await?;
        tracing::info!("📁 Projeto criado: {} (cliente {})", project.id, project.customer_id);
        Ok(project)
    }

    pub async fn update_project(&self, id: Uuid, payload: &UpdateProjectPayload) -> Result<Project, AppError> {
        self.project_repo
            .update_details(id, payload.title.trim(), payload.description.as_deref())
            .await?
            .ok_or(AppError::ProjectNotFound)
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<(), AppError> {
        if !self.project_repo.delete(id).await? {
            return Err(AppError::ProjectNotFound);
        }
        Ok(())
    }

    /// Atribui (ou remove) o funcionário responsável numa única transação.
    ///
    /// Ao atribuir: o cliente NORMAL vira POTENTIAL e, se ainda não houver
    /// conversa, ela é aberta com uma mensagem de sistema. Remover o
    /// responsável nunca rebaixa o cliente.
    pub async fn assign_employee(&self, project_id: Uuid, employee_id: Option<Uuid>) -> Result<Project, AppError> {
        let employee = match employee_id {
            Some(id) => Some(
                self.user_repo
                    .find_with_role(id, Role::Employee)
                    .await?
                    .ok_or_else(|| field_error("employeeId", "assignee_must_be_employee"))?,
            ),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let project = self
            .project_repo
            .find_for_update(&mut *tx, project_id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        let updated = self
            .project_repo
            .set_assignee(&mut *tx, project_id, employee_id)
            .await?;

        if let Some(employee) = &employee {
            if self
                .user_repo
                .promote_to_potential(&mut *tx, project.customer_id)
                .await?
            {
                tracing::info!("⭐ Cliente {} promovido a POTENTIAL", project.customer_id);
            }

            // O UNIQUE em conversations.customer_id resolve atribuições simultâneas
            if let Some(conversation) = self
                .conversation_repo
                .create_if_absent(&mut *tx, project.customer_id)
                .await?
            {
                self.conversation_repo
                    .add_message(
                        &mut *tx,
                        conversation.id,
                        SenderRole::System,
                        &assignment_notice(&project.title, &employee.name),
                        None,
                        None,
                    )
                    .await?;
                tracing::info!("💬 Conversa aberta para o cliente {}", project.customer_id);
            }
        }

        tx.commit().await?;

        match &employee {
            Some(e) => tracing::info!("👷 Projeto {} atribuído a {}", project_id, e.id),
            None => tracing::info!("👷 Projeto {} sem responsável", project_id),
        }
        Ok(updated)
    }

    pub async fn set_deadline(&self, id: Uuid, deadline: Option<DateTime<Utc>>) -> Result<Project, AppError> {
        self.project_repo
            .set_deadline(id, deadline)
            .await?
            .ok_or(AppError::ProjectNotFound)
    }

    pub async fn toggle_completion(&self, user: &User, id: Uuid) -> Result<Project, AppError> {
        let project = self.require_project(id).await?;
        if !can_toggle_completion(user, &project) {
            return Err(AppError::Forbidden);
        }
        self.project_repo
            .toggle_completion(id)
            .await?
            .ok_or(AppError::ProjectNotFound)
    }

    /// Admin orça qualquer projeto; funcionário só de clientes que atende.
    pub async fn add_quote(&self, user: &User, project_id: Uuid, payload: &CreateQuotePayload) -> Result<Quote, AppError> {
        let project = self.require_project(project_id).await?;

        if user.is_employee() {
            let serves = self
                .project_repo
                .employee_serves_customer(user.id, project.customer_id)
                .await?;
            if !serves {
                return Err(AppError::Forbidden);
            }
        } else if !user.is_admin() {
            return Err(AppError::Forbidden);
        }

        let quote = self
            .project_repo
            .create_quote(project_id, payload.amount, payload.details.as_deref())
            .await?;
        tracing::info!("💰 Orçamento {} criado para o projeto {}", quote.id, project_id);
        Ok(quote)
    }
}
