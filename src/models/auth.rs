// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Employee,
    Customer,
}

// Classificação do cliente: NORMAL ou POTENTIAL (encaminhado para acompanhamento)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "customer_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerType {
    Normal,
    Potential,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: Option<String>,

    pub image: Option<String>,
    pub role: Role,
    pub customer_type: Option<CustomerType>,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }

    pub fn is_customer(&self) -> bool {
        self.role == Role::Customer
    }

    pub fn is_potential_customer(&self) -> bool {
        self.is_customer() && self.customer_type == Some(CustomerType::Potential)
    }
}

// Dados de inserção de um usuário (qualquer papel)
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub image: Option<&'a str>,
    pub role: Role,
    pub customer_type: Option<CustomerType>,
}

// Registro de cliente (papel CUSTOMER, tipo NORMAL)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterCustomerPayload {
    #[validate(length(min = 2, message = "name_too_short"))]
    #[schema(example = "Chan Tai Man")]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "client@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

// Criação do primeiro administrador
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InitAdminPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestOtpPayload {
    #[validate(length(min = 6, max = 20, message = "invalid_phone"))]
    #[schema(example = "91234567")]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpPayload {
    #[validate(length(min = 6, max = 20, message = "invalid_phone"))]
    pub phone: String,
    #[validate(custom(function = "validate_otp_code"))]
    #[schema(example = "042917")]
    pub code: String,
}

// Exatamente 6 dígitos ASCII
fn validate_otp_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("otp_format").with_message("invalid_otp_format".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignInPayload {
    #[validate(length(min = 1, message = "required"))]
    pub id_token: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequestedResponse {
    pub phone: String,
    pub expires_at: DateTime<Utc>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub role: Role,
    pub customer_type: Option<CustomerType>,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn user(role: Role, customer_type: Option<CustomerType>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Teste".into(),
            email: Some("teste@example.com".into()),
            phone: None,
            password_hash: None,
            image: None,
            role,
            customer_type,
            is_subscribed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::user;
    use super::*;

    #[test]
    fn only_customers_carry_the_potential_tier() {
        assert!(user(Role::Customer, Some(CustomerType::Potential)).is_potential_customer());
        assert!(!user(Role::Customer, Some(CustomerType::Normal)).is_potential_customer());
        assert!(!user(Role::Employee, Some(CustomerType::Potential)).is_potential_customer());
    }

    #[test]
    fn register_payload_boundaries() {
        let ok = RegisterCustomerPayload {
            name: "Al".into(),
            email: "al@example.com".into(),
            password: "123456".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterCustomerPayload {
            name: "A".into(),
            email: "nao-e-email".into(),
            password: "12345".into(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn otp_code_must_be_six_digits() {
        let code = |c: &str| VerifyOtpPayload { phone: "91234567".into(), code: c.into() };

        assert!(code("123456").validate().is_ok());
        assert!(code("042917").validate().is_ok());

        for bad in ["12345", "1234567", "abcdef", "12 345", "12345a", "１２３４５６"] {
            let errors = code(bad).validate().unwrap_err();
            let field = &errors.field_errors()["code"][0];
            assert_eq!(field.message.as_deref(), Some("invalid_otp_format"), "{}", bad);
        }
    }

    #[test]
    fn user_serialization_hides_password_hash() {
        let mut u = user(Role::Customer, Some(CustomerType::Normal));
        u.password_hash = Some("$2b$10$hash".into());
        let json = serde_json::to_value(&u).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "CUSTOMER");
        assert_eq!(json["customerType"], "NORMAL");
    }
}
