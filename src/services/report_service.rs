// src/services/report_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{
        error::{field_error, AppError},
        form::UploadedFile,
    },
    db::{ProjectRepository, ReportRepository},
    models::{
        auth::User,
        report::{
            ActivityInput, CreateReportPayload, Report, ReportListItem, SalesActivity,
            UpdateReportPayload, Workspace,
        },
    },
    services::storage::Storage,
};

#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    project_repo: ProjectRepository,
    storage: Storage,
}

impl ReportService {
    pub fn new(report_repo: ReportRepository, project_repo: ProjectRepository, storage: Storage) -> Self {
        Self { report_repo, project_repo, storage }
    }

    /// O projeto vinculado precisa existir; para funcionários, precisa ser dele.
    async fn check_project_link(&self, author: &User, project_id: Option<Uuid>) -> Result<(), AppError> {
        let Some(project_id) = project_id else {
            return Ok(());
        };
        let project = self
            .project_repo
            .find_by_id(project_id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        if author.is_employee() && project.assigned_employee_id != Some(author.id) {
            return Err(field_error("projectId", "project_not_assigned_to_you"));
        }
        Ok(())
    }

    pub async fn create_report(&self, author: &User, payload: &CreateReportPayload) -> Result<Report, AppError> {
        if !payload.report_type.allowed_for(author.role) {
            return Err(field_error("type", "report_type_not_allowed"));
        }
        self.check_project_link(author, payload.project_id).await?;

        let report = self
            .report_repo
            .create_report(
                payload.report_type,
                payload.title.trim(),
                &payload.content,
                author.id,
                payload.project_id,
            )
            .await?;
        tracing::info!("📝 Relatório {} criado por {}", report.id, author.id);
        Ok(report)
    }

    pub async fn update_report(&self, id: Uuid, payload: &UpdateReportPayload) -> Result<Report, AppError> {
        if let Some(project_id) = payload.project_id {
            self.project_repo
                .find_by_id(project_id)
                .await?
                .ok_or(AppError::ProjectNotFound)?;
        }
        self.report_repo
            .update_report(
                id,
                payload.report_type,
                payload.title.trim(),
                &payload.content,
                payload.project_id,
            )
            .await?
            .ok_or(AppError::ReportNotFound)
    }

    pub async fn delete_report(&self, id: Uuid) -> Result<(), AppError> {
        if !self.report_repo.delete_report(id).await? {
            return Err(AppError::ReportNotFound);
        }
        Ok(())
    }

    pub async fn list_reports(&self) -> Result<Vec<ReportListItem>, AppError> {
        self.report_repo.list_all().await
    }

    pub async fn list_activities(&self) -> Result<Vec<SalesActivity>, AppError> {
        self.report_repo.list_activities().await
    }

    // --- Área do funcionário ---

    pub async fn workspace(&self, user: &User) -> Result<Workspace, AppError> {
        let reports = self.report_repo.list_by_author(user.id).await?;
        let activities = self.report_repo.list_activities_by_author(user.id).await?;
        Ok(Workspace { reports, activities })
    }

    /// Apaga um relatório do próprio autor. Relatório alheio responde 404.
    pub async fn delete_own_report(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        if !self.report_repo.delete_report_of_author(id, user.id).await? {
            return Err(AppError::ReportNotFound);
        }
        Ok(())
    }

    /// Admin apaga qualquer atividade; funcionário só as suas.
    pub async fn delete_activity(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        let author = if user.is_admin() { None } else { Some(user.id) };
        if !self.report_repo.delete_activity(id, author).await? {
            return Err(AppError::ActivityNotFound);
        }
        Ok(())
    }

    pub async fn create_activity(
        &self,
        author: &User,
        input: &ActivityInput,
        image: Option<&UploadedFile>,
    ) -> Result<SalesActivity, AppError> {
        let image_url = match image {
            Some(file) => Some(
                self.storage
                    .upload_image(&format!("activities/{}", author.id), file)
                    .await?,
            ),
            None => None,
        };

        let title = input.resolved_title(Utc::now().date_naive());
        let activity = self
            .report_repo
            .create_activity(&title, &input.content, image_url.as_deref(), author.id)
            .await?;
        tracing::info!("📌 Atividade {} registrada por {}", activity.id, author.id);
        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{ProjectRepository, ReportRepository},
        models::{
            auth::{fixtures::user, Role},
            report::ReportType,
        },
    };
    use sqlx::postgres::PgPoolOptions;

    fn service() -> ReportService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        ReportService::new(
            ReportRepository::new(pool.clone()),
            ProjectRepository::new(pool),
            Storage::memory("/uploads").unwrap(),
        )
    }

    #[tokio::test]
    async fn employee_cannot_file_amount_reports() {
        let employee = user(Role::Employee, None);
        let payload = CreateReportPayload {
            report_type: ReportType::Amount,
            title: "Faturamento".into(),
            content: "Mês fechado".into(),
            project_id: None,
        };
        let err = service().create_report(&employee, &payload).await.unwrap_err();
        match err {
            AppError::FormError(fields) => assert_eq!(fields["type"], "report_type_not_allowed"),
            other => panic!("erro inesperado: {other:?}"),
        }
    }
}
