// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{
        AuthResponse, GoogleSignInPayload, InitAdminPayload, LoginPayload, OtpRequestedResponse,
        RegisterCustomerPayload, RequestOtpPayload, User, VerifyOtpPayload,
    },
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterCustomerPayload,
    responses(
        (status = 201, description = "Cliente registrado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já existe")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .auth_service
        .register_customer(payload.name.trim(), payload.email.trim(), &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .auth_service
        .login_user(payload.email.trim(), &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(AuthResponse { token }))
}

// POST /api/auth/init-admin
#[utoipa::path(
    post,
    path = "/api/auth/init-admin",
    tag = "Auth",
    request_body = InitAdminPayload,
    responses(
        (status = 201, description = "Administrador criado", body = User),
        (status = 409, description = "Já existe um administrador")
    )
)]
pub async fn init_admin(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<InitAdminPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let admin = app_state
        .auth_service
        .create_initial_admin(payload.name.trim(), payload.email.trim(), &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(admin)))
}

// POST /api/auth/otp/request
#[utoipa::path(
    post,
    path = "/api/auth/otp/request",
    tag = "Auth",
    request_body = RequestOtpPayload,
    responses(
        (status = 200, description = "Código enviado por SMS", body = OtpRequestedResponse),
        (status = 502, description = "Falha no envio do SMS")
    )
)]
pub async fn request_otp(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RequestOtpPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (phone, expires_at) = app_state
        .otp_service
        .request_code(&payload.phone)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(OtpRequestedResponse { phone, expires_at }))
}

// POST /api/auth/otp/verify
#[utoipa::path(
    post,
    path = "/api/auth/otp/verify",
    tag = "Auth",
    request_body = VerifyOtpPayload,
    responses(
        (status = 200, description = "Código aceito", body = AuthResponse),
        (status = 400, description = "Código inválido ou expirado"),
        (status = 429, description = "Tentativas esgotadas")
    )
)]
pub async fn verify_otp(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<VerifyOtpPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .otp_service
        .verify_code(&payload.phone, &payload.code)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(AuthResponse { token }))
}

// POST /api/auth/google
#[utoipa::path(
    post,
    path = "/api/auth/google",
    tag = "Auth",
    request_body = GoogleSignInPayload,
    responses(
        (status = 200, description = "Login com Google", body = AuthResponse),
        (status = 401, description = "Token do Google recusado")
    )
)]
pub async fn google_sign_in(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<GoogleSignInPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .oauth_service
        .google_sign_in(&payload.id_token)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(AuthResponse { token }))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = User),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
