// src/handlers/staff.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        role::{EmployeeOnly, RequireRole},
    },
    models::{
        project::{Project, StaffProjectPayload},
        staff::{StaffClient, StaffClientDetail},
    },
};

// GET /api/staff/clients
#[utoipa::path(
    get,
    path = "/api/staff/clients",
    tag = "Staff",
    responses((status = 200, description = "Clientes POTENTIAL com projetos meus", body = Vec<StaffClient>)),
    security(("api_jwt" = []))
)]
pub async fn my_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<EmployeeOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let clients = app_state
        .staff_service
        .my_clients(&guard.user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(clients))
}

// GET /api/staff/clients/{id}
#[utoipa::path(
    get,
    path = "/api/staff/clients/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Projetos e conversa do cliente", body = StaffClientDetail),
        (status = 403, description = "Cliente não atendido por mim")
    ),
    security(("api_jwt" = []))
)]
pub async fn client_detail(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<EmployeeOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .staff_service
        .client_detail(&guard.user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// POST /api/staff/clients/{id}/projects
#[utoipa::path(
    post,
    path = "/api/staff/clients/{id}/projects",
    tag = "Staff",
    request_body = StaffProjectPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 201, description = "Projeto criado já atribuído a mim", body = Project),
        (status = 403, description = "Cliente não atendido por mim")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client_project(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<EmployeeOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StaffProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .staff_service
        .create_project_for_client(&guard.user, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}
