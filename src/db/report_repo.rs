// src/db/report_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::report::{Report, ReportListItem, ReportType, SalesActivity},
};

const REPORT_COLUMNS: &str =
    "id, type, title, content, author_id, project_id, created_at, updated_at";

const ACTIVITY_COLUMNS: &str = "id, title, content, image_url, author_id, created_at";

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  RELATÓRIOS
    // =========================================================================

    pub async fn create_report(
        &self,
        report_type: ReportType,
        title: &str,
        content: &str,
        author_id: Uuid,
        project_id: Option<Uuid>,
    ) -> Result<Report, AppError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports (type, title, content, author_id, project_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(report_type)
        .bind(title)
        .bind(content)
        .bind(author_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn update_report(
        &self,
        id: Uuid,
        report_type: ReportType,
        title: &str,
        content: &str,
        project_id: Option<Uuid>,
    ) -> Result<Option<Report>, AppError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports
            SET type = $2, title = $3, content = $4, project_id = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(report_type)
        .bind(title)
        .bind(content)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn delete_report(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apaga só se o relatório for do autor informado.
    pub async fn delete_report_of_author(&self, id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_all(&self) -> Result<Vec<ReportListItem>, AppError> {
        let reports = sqlx::query_as::<_, ReportListItem>(
            r#"
            SELECT r.id, r.type, r.title, r.content, r.author_id, a.name AS author_name,
                   r.project_id, p.title AS project_title, r.created_at
            FROM reports r
            JOIN users a ON a.id = r.author_id
            LEFT JOIN projects p ON p.id = r.project_id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Report>, AppError> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE author_id = $1 ORDER BY created_at DESC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    // =========================================================================
    //  ATIVIDADES DE VENDA
    // =========================================================================

    pub async fn create_activity(
        &self,
        title: &str,
        content: &str,
        image_url: Option<&str>,
        author_id: Uuid,
    ) -> Result<SalesActivity, AppError> {
        let activity = sqlx::query_as::<_, SalesActivity>(&format!(
            r#"
            INSERT INTO sales_activities (title, content, image_url, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACTIVITY_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(content)
        .bind(image_url)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(activity)
    }

    pub async fn list_activities(&self) -> Result<Vec<SalesActivity>, AppError> {
        let activities = sqlx::query_as::<_, SalesActivity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM sales_activities ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }

    pub async fn list_activities_by_author(&self, author_id: Uuid) -> Result<Vec<SalesActivity>, AppError> {
        let activities = sqlx::query_as::<_, SalesActivity>(&format!(
            r#"
            SELECT {ACTIVITY_COLUMNS} FROM sales_activities
            WHERE author_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }

    pub async fn delete_activity(&self, id: Uuid, author_id: Option<Uuid>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM sales_activities WHERE id = $1 AND ($2::uuid IS NULL OR author_id = $2)",
        )
        .bind(id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
