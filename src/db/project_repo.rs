// src/db/project_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::project::{DisplayProjectRow, Project, ProjectStatus, Quote, QuoteSheet},
};

const PROJECT_COLUMNS: &str = "id, title, description, status, customer_id, assigned_employee_id, \
     deadline, is_completed, created_at, updated_at";

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PROJETOS
    // =========================================================================

    pub async fn create_project<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        title: &str,
        description: Option<&str>,
        assigned_employee_id: Option<Uuid>,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let status = ProjectStatus::for_assignee(assigned_employee_id);

        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (customer_id, title, description, status, assigned_employee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(assigned_employee_id)
        .fetch_one(executor)
        .await?;
        Ok(project)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    /// Versão travada para a transação de atribuição.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(project)
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET title = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Listagem do admin com cliente e funcionário responsáveis.
    pub async fn list_display(&self) -> Result<Vec<DisplayProjectRow>, AppError> {
        let rows = sqlx::query_as::<_, DisplayProjectRow>(
            r#"
            SELECT p.id, p.title, p.description, p.status, p.deadline, p.is_completed,
                   p.created_at,
                   c.id AS customer_id, c.name AS customer_name, c.email AS customer_email,
                   p.assigned_employee_id,
                   e.name AS employee_name, e.email AS employee_email
            FROM projects p
            JOIN users c ON c.id = p.customer_id
            LEFT JOIN users e ON e.id = p.assigned_employee_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Define ou limpa o responsável; o status acompanha.
    pub async fn set_assignee<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        employee_id: Option<Uuid>,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET assigned_employee_id = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(employee_id)
        .bind(ProjectStatus::for_assignee(employee_id))
        .fetch_one(executor)
        .await?;
        Ok(project)
    }

    /// Devolve para PENDING todos os projetos de um funcionário.
    pub async fn release_projects_of<'e, E>(&self, executor: E, employee_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET assigned_employee_id = NULL, status = 'PENDING', updated_at = NOW()
            WHERE assigned_employee_id = $1
            "#,
        )
        .bind(employee_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_deadline(
        &self,
        id: Uuid,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET deadline = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(deadline)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    /// Inverte `is_completed` (aplicar duas vezes volta ao estado original).
    pub async fn toggle_completion(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET is_completed = NOT is_completed, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    pub async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE customer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    /// Projetos de um cliente atribuídos a um funcionário.
    pub async fn list_assigned_for_customer(
        &self,
        employee_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS} FROM projects
            WHERE customer_id = $1 AND assigned_employee_id = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(customer_id)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    /// Mesma coisa para vários clientes de uma vez.
    pub async fn list_assigned_for_customers(
        &self,
        employee_id: Uuid,
        customer_ids: &[Uuid],
    ) -> Result<Vec<Project>, AppError> {
        if customer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS} FROM projects
            WHERE customer_id = ANY($1) AND assigned_employee_id = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(customer_ids)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    /// O funcionário tem ao menos um projeto deste cliente?
    pub async fn employee_serves_customer(
        &self,
        employee_id: Uuid,
        customer_id: Uuid,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM projects
                WHERE customer_id = $1 AND assigned_employee_id = $2
            )
            "#,
        )
        .bind(customer_id)
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // =========================================================================
    //  ORÇAMENTOS
    // =========================================================================

    pub async fn create_quote(
        &self,
        project_id: Uuid,
        amount: Decimal,
        details: Option<&str>,
    ) -> Result<Quote, AppError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (project_id, amount, details)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, amount, details, created_at
            "#,
        )
        .bind(project_id)
        .bind(amount)
        .bind(details)
        .fetch_one(&self.pool)
        .await?;
        Ok(quote)
    }

    pub async fn list_quotes_for_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Quote>, AppError> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, project_id, amount, details, created_at
            FROM quotes WHERE project_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(quotes)
    }

    /// Tudo o que o PDF do orçamento precisa numa linha só.
    pub async fn quote_sheet(&self, quote_id: Uuid) -> Result<Option<QuoteSheet>, AppError> {
        let sheet = sqlx::query_as::<_, QuoteSheet>(
            r#"
            SELECT q.id AS quote_id, q.amount, q.details, q.created_at AS quoted_at,
                   p.id AS project_id, p.title AS project_title,
                   p.description AS project_description,
                   c.id AS customer_id, c.name AS customer_name, c.email AS customer_email,
                   p.assigned_employee_id
            FROM quotes q
            JOIN projects p ON p.id = q.project_id
            JOIN users c ON c.id = p.customer_id
            WHERE q.id = $1
            "#,
        )
        .bind(quote_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sheet)
    }
}
