// src/models/employee.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub assigned_projects: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeePayload {
    #[validate(length(min = 2, message = "name_too_short"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Senha vazia no formulário de edição significa "manter a atual"
fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() || password.chars().count() >= 6 {
        Ok(())
    } else {
        Err(ValidationError::new("length").with_message("password_too_short".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 2, message = "name_too_short"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(custom(function = "validate_new_password"))]
    pub password: Option<String>,
}

impl UpdateEmployeePayload {
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(password: Option<&str>) -> UpdateEmployeePayload {
        UpdateEmployeePayload {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn empty_password_keeps_the_current_one() {
        let payload = update(Some(""));
        assert!(payload.validate().is_ok());
        assert_eq!(payload.new_password(), None);
        assert!(update(None).validate().is_ok());
    }

    #[test]
    fn short_new_password_is_rejected() {
        assert!(update(Some("12345")).validate().is_err());
        let payload = update(Some("123456"));
        assert!(payload.validate().is_ok());
        assert_eq!(payload.new_password(), Some("123456"));
    }
}
