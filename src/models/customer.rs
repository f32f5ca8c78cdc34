// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::models::{
    auth::{CustomerType, User},
    project::ProjectWithQuotes,
};

// --- Etiquetas ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Cor no formato #RRGGBB
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_color").with_message("invalid_color".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TagPayload {
    #[validate(length(min = 1, max = 20, message = "tag_name_length"))]
    #[schema(example = "VIP")]
    pub name: String,
    #[validate(custom(function = "validate_hex_color"))]
    #[schema(example = "#FF8800")]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTagPayload {
    pub tag_id: Uuid,
}

// --- Cartão de contato ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContact {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub extra_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// E-mail vazio é aceito (campo opcional no cartão)
pub fn validate_email_or_empty(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || email.trim().to_string().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("invalid_email".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[validate(length(min = 1, max = 100, message = "too_long"))]
    pub name: String,
    #[validate(length(max = 100, message = "too_long"))]
    pub company: Option<String>,
    #[validate(custom(function = "validate_email_or_empty"))]
    pub email: Option<String>,
    #[validate(length(max = 200, message = "too_long"))]
    pub address: Option<String>,
    #[validate(length(max = 100, message = "too_long"))]
    pub contact_person: Option<String>,
    #[validate(length(max = 50, message = "too_long"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "too_long"))]
    pub extra_info: Option<String>,
}

impl ContactPayload {
    /// Campos opcionais em branco são gravados como NULL.
    pub fn normalized(self) -> Self {
        fn blank_to_none(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            name: self.name.trim().to_string(),
            company: blank_to_none(self.company),
            email: blank_to_none(self.email),
            address: blank_to_none(self.address),
            contact_person: blank_to_none(self.contact_person),
            phone: blank_to_none(self.phone),
            extra_info: blank_to_none(self.extra_info),
        }
    }
}

// --- Clientes ---

#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
    pub project_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
    pub project_count: i64,
    pub tags: Vec<Tag>,
}

impl CustomerSummary {
    pub fn from_row(row: CustomerRow, tags: Vec<Tag>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            customer_type: row.customer_type,
            is_subscribed: row.is_subscribed,
            created_at: row.created_at,
            project_count: row.project_count,
            tags,
        }
    }
}

// Linha da junção customer_tags usada para montar a listagem
#[derive(Debug, Clone, FromRow)]
pub struct CustomerTagRow {
    pub customer_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerTagRow> for Tag {
    fn from(row: CustomerTagRow) -> Self {
        Tag {
            id: row.id,
            name: row.name,
            color: row.color,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    pub customer: User,
    pub contact: Option<CustomerContact>,
    pub tags: Vec<Tag>,
    pub projects: Vec<ProjectWithQuotes>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CustomerFilter {
    pub customer_type: Option<CustomerType>,
    pub tag_id: Option<Uuid>,
    /// Busca livre por nome, e-mail ou telefone
    pub q: Option<String>,
}

impl CustomerFilter {
    /// Padrão ILIKE já com curingas, ou None quando a busca está vazia.
    pub fn search_pattern(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", q))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 2, message = "name_too_short"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
    pub customer_type: Option<CustomerType>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 2, message = "name_too_short"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    pub customer_type: CustomerType,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCustomerTypePayload {
    pub customer_type: CustomerType,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkDeletePayload {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedCount {
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(validate_hex_color("#A1b2C3").is_ok());
        assert!(validate_hex_color("A1B2C3").is_err());
        assert!(validate_hex_color("#A1B2C").is_err());
        assert!(validate_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn tag_name_must_be_between_1_and_20_chars() {
        let ok = TagPayload { name: "x".repeat(20), color: None };
        assert!(ok.validate().is_ok());
        let long = TagPayload { name: "x".repeat(21), color: None };
        assert!(long.validate().is_err());
        let empty = TagPayload { name: String::new(), color: Some("#000000".into()) };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn contact_accepts_empty_email_and_checks_lengths() {
        let contact = ContactPayload {
            name: "Loja Central".into(),
            company: Some("c".repeat(100)),
            email: Some(String::new()),
            address: None,
            contact_person: None,
            phone: Some("p".repeat(50)),
            extra_info: Some("e".repeat(500)),
        };
        assert!(contact.validate().is_ok());

        let too_long = ContactPayload {
            name: "n".repeat(101),
            company: None,
            email: Some("not-an-email".into()),
            address: Some("a".repeat(201)),
            contact_person: None,
            phone: None,
            extra_info: Some("e".repeat(501)),
        };
        let errors = too_long.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("address"));
    }

    #[test]
    fn normalized_contact_drops_blank_fields() {
        let contact = ContactPayload {
            name: " Ana ".into(),
            company: Some("  ".into()),
            email: Some(String::new()),
            address: Some("Rua 1".into()),
            contact_person: None,
            phone: None,
            extra_info: None,
        }
        .normalized();
        assert_eq!(contact.name, "Ana");
        assert!(contact.company.is_none());
        assert!(contact.email.is_none());
        assert_eq!(contact.address.as_deref(), Some("Rua 1"));
    }

    #[test]
    fn search_pattern_wraps_trimmed_query() {
        let filter = CustomerFilter { q: Some("  chan ".into()), ..Default::default() };
        assert_eq!(filter.search_pattern().as_deref(), Some("%chan%"));
        let blank = CustomerFilter { q: Some("   ".into()), ..Default::default() };
        assert!(blank.search_pattern().is_none());
    }
}
