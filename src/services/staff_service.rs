// src/services/staff_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ConversationRepository, ProjectRepository, UserRepository},
    models::{
        auth::{Role, User},
        conversation::ConversationWithMessages,
        project::{Project, ProjectWithQuotes, StaffProjectPayload},
        staff::{group_staff_clients, StaffClient, StaffClientDetail},
    },
    services::customer_service::attach_quotes,
};

#[derive(Clone)]
pub struct StaffService {
    user_repo: UserRepository,
    project_repo: ProjectRepository,
    conversation_repo: ConversationRepository,
    pool: PgPool,
}

impl StaffService {
    pub fn new(
        user_repo: UserRepository,
        project_repo: ProjectRepository,
        conversation_repo: ConversationRepository,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, project_repo, conversation_repo, pool }
    }

    // Cliente POTENTIAL com ao menos um projeto meu; senão 403
    async fn accessible_client(&self, employee: &User, customer_id: Uuid) -> Result<User, AppError> {
        let client = self
            .user_repo
            .find_with_role(customer_id, Role::Customer)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let serves = self
            .project_repo
            .employee_serves_customer(employee.id, customer_id)
            .await?;
        if !serves || !client.is_potential_customer() {
            return Err(AppError::Forbidden);
        }
        Ok(client)
    }

    async fn my_projects_with_quotes(&self, employee_id: Uuid, customer_id: Uuid) -> Result<Vec<ProjectWithQuotes>, AppError> {
        let projects = self
            .project_repo
            .list_assigned_for_customer(employee_id, customer_id)
            .await?;
        let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let quotes = self.project_repo.list_quotes_for_projects(&ids).await?;
        Ok(attach_quotes(projects, quotes))
    }

    /// Três consultas em lote: projetos, orçamentos e últimas mensagens.
    pub async fn my_clients(&self, employee: &User) -> Result<Vec<StaffClient>, AppError> {
        let clients = self.user_repo.list_clients_of_employee(employee.id).await?;
        let client_ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();

        let projects = self
            .project_repo
            .list_assigned_for_customers(employee.id, &client_ids)
            .await?;
        let project_ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let quotes = self.project_repo.list_quotes_for_projects(&project_ids).await?;
        let latest = self
            .conversation_repo
            .latest_messages_for_customers(&client_ids)
            .await?;

        Ok(group_staff_clients(clients, attach_quotes(projects, quotes), latest))
    }

    pub async fn client_detail(&self, employee: &User, customer_id: Uuid) -> Result<StaffClientDetail, AppError> {
        let client = self.accessible_client(employee, customer_id).await?;
        let projects = self.my_projects_with_quotes(employee.id, customer_id).await?;

        let conversation = match self
            .conversation_repo
            .find_by_customer(&self.pool, customer_id)
            .await?
        {
            Some(conversation) => {
                let messages = self.conversation_repo.list_messages(conversation.id, None).await?;
                Some(ConversationWithMessages { conversation, messages })
            }
            None => None,
        };

        Ok(StaffClientDetail { client, projects, conversation })
    }

    /// Projeto novo já nasce ASSIGNED para o próprio funcionário.
    pub async fn create_project_for_client(
        &self,
        employee: &User,
        customer_id: Uuid,
        payload: &StaffProjectPayload,
    ) -> Result<Project, AppError> {
        self.accessible_client(employee, customer_id).await?;

        let project = self
            .project_repo
            .create_project(
                &self.pool,
                customer_id,
                payload.title.trim(),
                payload.description.as_deref(),
                Some(employee.id),
            )
            .await?;
        tracing::info!("📁 Projeto {} criado por {} para {}", project.id, employee.id, customer_id);
        Ok(project)
    }
}
