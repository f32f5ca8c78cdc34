// src/models/report.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::form::FormFields, models::auth::Role};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "report_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportType {
    Sales,
    Product,
    Amount,
    Broadcast,
    Employee,
}

impl ReportType {
    /// Funcionários só registram relatórios de vendas ou de equipe;
    /// o administrador registra qualquer tipo.
    pub fn allowed_for(self, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Employee => matches!(self, ReportType::Sales | ReportType::Employee),
            Role::Customer => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Listagem administrativa: relatório + nome do autor + título do projeto
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportListItem {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub project_id: Option<Uuid>,
    pub project_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportPayload {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    #[validate(length(min = 1, message = "title_required"))]
    pub title: String,
    #[validate(length(min = 1, message = "content_required"))]
    pub content: String,
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportPayload {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    #[validate(length(min = 1, message = "title_required"))]
    pub title: String,
    #[validate(length(min = 1, message = "content_required"))]
    pub content: String,
    pub project_id: Option<Uuid>,
}

// --- Atividades de venda ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesActivity {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Título padrão de uma atividade sem título: "{tipo} - {AAAA-MM-DD}".
pub fn default_activity_title(activity_type: &str, date: NaiveDate) -> String {
    let kind = activity_type.trim();
    let kind = if kind.is_empty() { "Activity" } else { kind };
    format!("{} - {}", kind, date.format("%Y-%m-%d"))
}

// Campos do formulário multipart de atividade (imagem opcional à parte)
#[derive(Debug, Clone, Validate)]
pub struct ActivityInput {
    pub activity_type: String,
    pub title: Option<String>,
    #[validate(length(min = 1, message = "content_required"))]
    pub content: String,
}

impl ActivityInput {
    pub fn from_form(form: &FormFields) -> Self {
        Self {
            activity_type: form.text("type").unwrap_or_default(),
            title: form.text("title"),
            content: form.text("content").unwrap_or_default(),
        }
    }

    pub fn resolved_title(&self, date: NaiveDate) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => default_activity_title(&self.activity_type, date),
        }
    }
}

#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ActivityForm {
    #[schema(rename = "type", example = "Visit")]
    pub activity_type: Option<String>,
    pub title: Option<String>,
    pub content: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

// Área de trabalho do funcionário
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub reports: Vec<Report>,
    pub activities: Vec<SalesActivity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employees_are_limited_to_sales_and_employee_reports() {
        assert!(ReportType::Sales.allowed_for(Role::Employee));
        assert!(ReportType::Employee.allowed_for(Role::Employee));
        assert!(!ReportType::Amount.allowed_for(Role::Employee));
        assert!(!ReportType::Broadcast.allowed_for(Role::Employee));
        assert!(!ReportType::Product.allowed_for(Role::Employee));
    }

    #[test]
    fn admins_may_file_any_report_and_customers_none() {
        for t in [
            ReportType::Sales,
            ReportType::Product,
            ReportType::Amount,
            ReportType::Broadcast,
            ReportType::Employee,
        ] {
            assert!(t.allowed_for(Role::Admin));
            assert!(!t.allowed_for(Role::Customer));
        }
    }

    #[test]
    fn activity_title_defaults_to_type_and_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(default_activity_title("Visit", date), "Visit - 2025-03-07");
        assert_eq!(default_activity_title("  ", date), "Activity - 2025-03-07");
    }

    #[test]
    fn activity_form_falls_back_to_generated_title() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let form = FormFields::from_pairs(&[("type", "Call"), ("title", " "), ("content", "Ligou")]);
        let input = ActivityInput::from_form(&form);
        assert!(input.validate().is_ok());
        assert_eq!(input.resolved_title(date), "Call - 2025-03-07");

        let titled = ActivityInput::from_form(&FormFields::from_pairs(&[("title", "Feira"), ("content", "x")]));
        assert_eq!(titled.resolved_title(date), "Feira");
    }

    #[test]
    fn activity_requires_content() {
        let input = ActivityInput::from_form(&FormFields::from_pairs(&[("type", "Visit")]));
        assert!(input.validate().is_err());
    }

    #[test]
    fn report_type_uses_uppercase_on_the_wire() {
        let payload: CreateReportPayload = serde_json::from_str(
            r#"{"type":"SALES","title":"Visita","content":"Cliente satisfeito"}"#,
        )
        .unwrap();
        assert_eq!(payload.report_type, ReportType::Sales);
        assert!(payload.project_id.is_none());
    }
}
