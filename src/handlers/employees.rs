// src/handlers/employees.rs

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
        role::{AdminOnly, RequireRole},
    },
    models::{
        auth::User,
        employee::{CreateEmployeePayload, EmployeeSummary, UpdateEmployeePayload},
    },
};

// GET /api/admin/employees
#[utoipa::path(
    get,
    path = "/api/admin/employees",
    tag = "Employees",
    responses((status = 200, description = "Funcionários e projetos atribuídos", body = Vec<EmployeeSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let employees = app_state
        .employee_service
        .list_employees()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(employees))
}

// POST /api/admin/employees
#[utoipa::path(
    post,
    path = "/api/admin/employees",
    tag = "Employees",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Funcionário criado", body = User),
        (status = 409, description = "E-mail já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .employee_service
        .create_employee(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(employee)))
}

// PUT /api/admin/employees/{id}
#[utoipa::path(
    put,
    path = "/api/admin/employees/{id}",
    tag = "Employees",
    request_body = UpdateEmployeePayload,
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário atualizado", body = User),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .employee_service
        .update_employee(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(employee))
}

// DELETE /api/admin/employees/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 204, description = "Funcionário removido; projetos voltam a PENDING"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .employee_service
        .delete_employee(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
