// src/handlers/projects.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        role::{AdminOnly, RequireRole, StaffOrAdmin},
    },
    models::project::{
        AssignEmployeePayload, CreateProjectPayload, CreateQuotePayload, DeadlinePayload,
        DisplayProject, Project, Quote, UpdateProjectPayload,
    },
};

// =============================================================================
//  ÁREA 1: GESTÃO (ADMIN)
// =============================================================================

// GET /api/admin/projects
#[utoipa::path(
    get,
    path = "/api/admin/projects",
    tag = "Projects",
    responses((status = 200, description = "Projetos com cliente e responsável", body = Vec<DisplayProject>)),
    security(("api_jwt" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let projects = app_state
        .project_service
        .list_projects()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(projects))
}

// POST /api/admin/projects
#[utoipa::path(
    post,
    path = "/api/admin/projects",
    tag = "Projects",
    request_body = CreateProjectPayload,
    responses(
        (status = 201, description = "Projeto criado (PENDING)", body = Project),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .project_service
        .create_project(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// PUT /api/admin/projects/{id}
#[utoipa::path(
    put,
    path = "/api/admin/projects/{id}",
    tag = "Projects",
    request_body = UpdateProjectPayload,
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Projeto atualizado", body = Project),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_project(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .project_service
        .update_project(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(project))
}

// DELETE /api/admin/projects/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 204, description = "Projeto removido"),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_project(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .project_service
        .delete_project(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/admin/projects/{id}/assignee
#[utoipa::path(
    put,
    path = "/api/admin/projects/{id}/assignee",
    tag = "Projects",
    request_body = AssignEmployeePayload,
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Responsável definido ou removido", body = Project),
        (status = 400, description = "O responsável precisa ser funcionário"),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignEmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .assign_employee(id, payload.employee_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(project))
}

// PUT /api/admin/projects/{id}/deadline
#[utoipa::path(
    put,
    path = "/api/admin/projects/{id}/deadline",
    tag = "Projects",
    request_body = DeadlinePayload,
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Prazo definido ou removido", body = Project),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_deadline(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeadlinePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .set_deadline(id, payload.deadline)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(project))
}

// =============================================================================
//  ÁREA 2: EXECUÇÃO (ADMIN OU FUNCIONÁRIO)
// =============================================================================

// POST /api/projects/{id}/toggle-completion
#[utoipa::path(
    post,
    path = "/api/projects/{id}/toggle-completion",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Conclusão invertida", body = Project),
        (status = 403, description = "Projeto de outro funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_completion(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<StaffOrAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .toggle_completion(&guard.user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(project))
}

// POST /api/projects/{id}/quotes
#[utoipa::path(
    post,
    path = "/api/projects/{id}/quotes",
    tag = "Projects",
    request_body = CreateQuotePayload,
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 201, description = "Orçamento criado", body = Quote),
        (status = 400, description = "Valor precisa ser positivo"),
        (status = 403, description = "Cliente não atendido por este funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<StaffOrAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateQuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .project_service
        .add_quote(&guard.user, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(quote)))
}

// GET /api/quotes/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/quotes/{id}/pdf",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "PDF do orçamento", content_type = "application/pdf"),
        (status = 403, description = "Sem acesso a este orçamento"),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn quote_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let pdf_bytes = app_state
        .quote_document_service
        .quote_pdf(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"quote_{}.pdf\"", id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
