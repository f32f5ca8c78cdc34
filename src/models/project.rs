// src/models/project.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::auth::{CustomerType, User};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "project_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectStatus {
    Pending,
    Assigned,
}

impl ProjectStatus {
    /// Com responsável o projeto fica ASSIGNED; sem, volta a PENDING.
    pub fn for_assignee(assignee: Option<Uuid>) -> Self {
        match assignee {
            Some(_) => ProjectStatus::Assigned,
            None => ProjectStatus::Pending,
        }
    }
}

// Pedido do cliente (aplicação a um produto ou criado pela equipe)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub customer_id: Uuid,
    pub assigned_employee_id: Option<Uuid>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub project_id: Uuid,
    #[schema(value_type = f64, example = 1200.50)]
    pub amount: Decimal,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

// Linha da listagem administrativa de projetos (com cliente e responsável)
#[derive(Debug, Clone, FromRow)]
pub struct DisplayProjectRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub assigned_employee_id: Option<Uuid>,
    pub employee_name: Option<String>,
    pub employee_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProject {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub assigned_employee_id: Option<Uuid>,
    pub customer: PersonSummary,
    pub assigned_employee: Option<PersonSummary>,
}

impl From<DisplayProjectRow> for DisplayProject {
    fn from(row: DisplayProjectRow) -> Self {
        let assigned_employee = match (row.assigned_employee_id, row.employee_name) {
            (Some(id), Some(name)) => Some(PersonSummary {
                id,
                name,
                email: row.employee_email,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            deadline: row.deadline,
            is_completed: row.is_completed,
            created_at: row.created_at,
            assigned_employee_id: row.assigned_employee_id,
            customer: PersonSummary {
                id: row.customer_id,
                name: row.customer_name,
                email: row.customer_email,
            },
            assigned_employee,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithQuotes {
    #[serde(flatten)]
    pub project: Project,
    pub quotes: Vec<Quote>,
}

// Dados usados no PDF do orçamento
#[derive(Debug, Clone, FromRow)]
pub struct QuoteSheet {
    pub quote_id: Uuid,
    pub amount: Decimal,
    pub details: Option<String>,
    pub quoted_at: DateTime<Utc>,
    pub project_id: Uuid,
    pub project_title: String,
    pub project_description: Option<String>,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub assigned_employee_id: Option<Uuid>,
}

// Linha usada nos painéis: projeto + tier do cliente
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardProject {
    pub id: Uuid,
    pub title: String,
    pub status: ProjectStatus,
    pub is_completed: bool,
    pub deadline: Option<DateTime<Utc>>,
    pub customer_name: String,
    pub customer_type: Option<CustomerType>,
}

// --- Regras de acesso ---

/// Admin conclui qualquer projeto; funcionário só os atribuídos a ele.
pub fn can_toggle_completion(user: &User, project: &Project) -> bool {
    user.is_admin() || (user.is_employee() && project.assigned_employee_id == Some(user.id))
}

/// PDF do orçamento: admin, o funcionário responsável ou o próprio cliente.
pub fn can_view_quote(user: &User, sheet: &QuoteSheet) -> bool {
    user.is_admin()
        || (user.is_employee() && sheet.assigned_employee_id == Some(user.id))
        || (user.is_customer() && sheet.customer_id == user.id)
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "title_required"))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectPayload {
    #[validate(length(min = 1, message = "title_required"))]
    pub title: String,
    pub description: Option<String>,
}

// Projeto criado pelo funcionário para um cliente seu
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StaffProjectPayload {
    #[validate(length(min = 1, message = "title_required"))]
    pub title: String,
    pub description: Option<String>,
}

/// `employeeId: null` remove o responsável.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignEmployeePayload {
    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeadlinePayload {
    pub deadline: Option<DateTime<Utc>>,
}

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("range").with_message("amount_must_be_positive".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuotePayload {
    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(value_type = f64, example = 1500.0)]
    pub amount: Decimal,
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{fixtures::user, Role};

    fn project_assigned_to(employee: Option<Uuid>) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            title: "Etiquetas".into(),
            description: None,
            status: ProjectStatus::for_assignee(employee),
            customer_id: Uuid::new_v4(),
            assigned_employee_id: employee,
            deadline: None,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn completion_toggle_policy() {
        let admin = user(Role::Admin, None);
        let employee = user(Role::Employee, None);
        let other = user(Role::Employee, None);
        let customer = user(Role::Customer, Some(CustomerType::Potential));

        let mine = project_assigned_to(Some(employee.id));
        assert!(can_toggle_completion(&admin, &mine));
        assert!(can_toggle_completion(&employee, &mine));
        assert!(!can_toggle_completion(&other, &mine));
        assert!(!can_toggle_completion(&customer, &mine));
        assert!(!can_toggle_completion(&employee, &project_assigned_to(None)));
    }

    #[test]
    fn quote_visibility_policy() {
        let employee = user(Role::Employee, None);
        let customer = user(Role::Customer, Some(CustomerType::Normal));
        let sheet = QuoteSheet {
            quote_id: Uuid::new_v4(),
            amount: Decimal::new(100, 0),
            details: None,
            quoted_at: Utc::now(),
            project_id: Uuid::new_v4(),
            project_title: "P".into(),
            project_description: None,
            customer_id: customer.id,
            customer_name: "C".into(),
            customer_email: None,
            assigned_employee_id: Some(employee.id),
        };
        assert!(can_view_quote(&user(Role::Admin, None), &sheet));
        assert!(can_view_quote(&employee, &sheet));
        assert!(can_view_quote(&customer, &sheet));
        assert!(!can_view_quote(&user(Role::Employee, None), &sheet));
        assert!(!can_view_quote(&user(Role::Customer, None), &sheet));
    }

    #[test]
    fn quote_amount_must_be_positive() {
        let zero = CreateQuotePayload { amount: Decimal::ZERO, details: None };
        assert!(zero.validate().is_err());
        let ok = CreateQuotePayload { amount: Decimal::new(1, 2), details: None };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn status_follows_assignee() {
        assert_eq!(ProjectStatus::for_assignee(Some(Uuid::new_v4())), ProjectStatus::Assigned);
        assert_eq!(ProjectStatus::for_assignee(None), ProjectStatus::Pending);
    }

    #[test]
    fn display_project_without_employee_has_no_summary() {
        let row = DisplayProjectRow {
            id: Uuid::new_v4(),
            title: "Etiquetas de vinho".into(),
            description: None,
            status: ProjectStatus::Pending,
            deadline: None,
            is_completed: false,
            created_at: Utc::now(),
            customer_id: Uuid::new_v4(),
            customer_name: "Cliente".into(),
            customer_email: None,
            assigned_employee_id: None,
            employee_name: None,
            employee_email: None,
        };
        let display = DisplayProject::from(row);
        assert!(display.assigned_employee.is_none());
        assert_eq!(display.customer.name, "Cliente");
    }
}
