// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erro de domínio único da aplicação. Cada variante tem um código estável
// (usado no catálogo de traduções) e um status HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Erros de formulário montados à mão (multipart, regras entre campos)
    #[error("Formulário inválido")]
    FormError(HashMap<String, String>),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Telefone já existe")]
    PhoneAlreadyExists,

    #[error("Registro duplicado: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    #[error("Funcionário não encontrado")]
    EmployeeNotFound,

    #[error("Projeto não encontrado")]
    ProjectNotFound,

    #[error("Orçamento não encontrado")]
    QuoteNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Relatório não encontrado")]
    ReportNotFound,

    #[error("Atividade não encontrada")]
    ActivityNotFound,

    #[error("Anúncio não encontrado")]
    BroadcastNotFound,

    #[error("Conversa não encontrada")]
    ConversationNotFound,

    #[error("Etiqueta não encontrada")]
    TagNotFound,

    #[error("Contato não encontrado")]
    ContactNotFound,

    #[error("Já existe um administrador")]
    AdminAlreadyExists,

    #[error("Mensagem vazia")]
    EmptyMessage,

    #[error("Código OTP inválido")]
    OtpInvalid,

    #[error("Código OTP expirado")]
    OtpExpired,

    #[error("Tentativas de OTP esgotadas")]
    OtpTooManyAttempts,

    #[error("Falha ao enviar SMS: {0}")]
    SmsDelivery(String),

    #[error("Login social recusado: {0}")]
    OAuthRejected(String),

    #[error("Formulário multipart inválido: {0}")]
    BadMultipart(String),

    #[error("Formato de imagem não suportado")]
    UnsupportedImage,

    #[error("Imagem maior que o permitido")]
    ImageTooLarge,

    #[error("Erro de armazenamento: {0}")]
    Storage(#[from] opendal::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// A resposta de erro que vai para o cliente, já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl AppError {
    /// Código estável do erro (chave no catálogo de traduções).
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::FormError(_) => "validation_failed",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::PhoneAlreadyExists => "phone_already_exists",
            AppError::UniqueConstraintViolation(_) => "duplicate_record",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::Forbidden => "forbidden",
            AppError::UserNotFound => "user_not_found",
            AppError::CustomerNotFound => "customer_not_found",
            AppError::EmployeeNotFound => "employee_not_found",
            AppError::ProjectNotFound => "project_not_found",
            AppError::QuoteNotFound => "quote_not_found",
            AppError::ProductNotFound => "product_not_found",
            AppError::ReportNotFound => "report_not_found",
            AppError::ActivityNotFound => "activity_not_found",
            AppError::BroadcastNotFound => "broadcast_not_found",
            AppError::ConversationNotFound => "conversation_not_found",
            AppError::TagNotFound => "tag_not_found",
            AppError::ContactNotFound => "contact_not_found",
            AppError::AdminAlreadyExists => "admin_already_exists",
            AppError::EmptyMessage => "empty_message",
            AppError::OtpInvalid => "otp_invalid",
            AppError::OtpExpired => "otp_expired",
            AppError::OtpTooManyAttempts => "otp_too_many_attempts",
            AppError::SmsDelivery(_) => "sms_delivery_failed",
            AppError::OAuthRejected(_) => "oauth_rejected",
            AppError::BadMultipart(_) => "bad_multipart",
            AppError::UnsupportedImage => "unsupported_image",
            AppError::ImageTooLarge => "image_too_large",
            AppError::Storage(_) => "storage_failed",
            _ => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::FormError(_)
            | AppError::EmptyMessage
            | AppError::OtpInvalid
            | AppError::OtpExpired
            | AppError::BadMultipart(_)
            | AppError::UnsupportedImage => StatusCode::BAD_REQUEST,

            AppError::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            AppError::EmailAlreadyExists
            | AppError::PhoneAlreadyExists
            | AppError::UniqueConstraintViolation(_)
            | AppError::AdminAlreadyExists => StatusCode::CONFLICT,

            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::OAuthRejected(_) => StatusCode::UNAUTHORIZED,

            AppError::Forbidden => StatusCode::FORBIDDEN,

            AppError::UserNotFound
            | AppError::CustomerNotFound
            | AppError::EmployeeNotFound
            | AppError::ProjectNotFound
            | AppError::QuoteNotFound
            | AppError::ProductNotFound
            | AppError::ReportNotFound
            | AppError::ActivityNotFound
            | AppError::BroadcastNotFound
            | AppError::ConversationNotFound
            | AppError::TagNotFound
            | AppError::ContactNotFound => StatusCode::NOT_FOUND,

            AppError::OtpTooManyAttempts => StatusCode::TOO_MANY_REQUESTS,

            AppError::SmsDelivery(_) | AppError::Storage(_) => StatusCode::BAD_GATEWAY,

            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro de domínio na resposta traduzida para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let error = store.translate(&locale.0, self.code());

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            let code = e.message.as_deref().unwrap_or_else(|| e.code.as_ref());
                            store.translate(&locale.0, code)
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(details)
            }
            AppError::FormError(errors) => Some(
                errors
                    .into_iter()
                    .map(|(field, code)| (field, vec![store.translate(&locale.0, &code)]))
                    .collect(),
            ),
            _ => None,
        };

        ApiError { status, error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Usado pelos guards, que não têm acesso ao idioma: responde no idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::shared())
            .into_response()
    }
}

// Atalho para montar um erro de formulário de um campo só.
pub fn field_error(field: &str, code: &str) -> AppError {
    let mut errors = HashMap::new();
    errors.insert(field.to_string(), code.to_string());
    AppError::FormError(errors)
}

// Converte violação de unicidade num erro amigável; o resto vira erro de banco.
pub(crate) fn map_unique_violation(e: sqlx::Error, on_unique: AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return on_unique;
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(AppError::ProjectNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::ConversationNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::ProjectNotFound.code(), "project_not_found");
    }

    #[test]
    fn auth_variants_map_to_401_and_403() {
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn otp_attempt_limit_is_429() {
        assert_eq!(AppError::OtpTooManyAttempts.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn validation_details_are_translated_per_field() {
        let store = I18nStore::shared();
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("password_too_short".into());
        errors.add("password", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), store);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(
            details["password"],
            vec!["Password must be at least 6 characters.".to_string()]
        );
    }

    #[test]
    fn form_error_keeps_field_name() {
        let api = field_error("scheduledAt", "schedule_in_past")
            .to_api_error(&Locale("zh".into()), I18nStore::shared());
        let details = api.details.expect("details");
        assert!(details.contains_key("scheduledAt"));
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("segredo"))
            .to_api_error(&Locale::default(), I18nStore::shared());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("segredo"));
        assert!(api.details.is_none());
    }
}
