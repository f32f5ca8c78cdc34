// src/handlers/reports.rs

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        form::FormFields,
    },
    config::AppState,
    middleware::{
        i18n::Locale,
        role::{AdminOnly, EmployeeOnly, RequireRole, StaffOrAdmin},
    },
    models::report::{
        ActivityForm, ActivityInput, CreateReportPayload, Report, ReportListItem, SalesActivity,
        UpdateReportPayload, Workspace,
    },
};

// =============================================================================
//  ÁREA 1: RELATÓRIOS
// =============================================================================

// POST /api/reports
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    request_body = CreateReportPayload,
    responses(
        (status = 201, description = "Relatório criado", body = Report),
        (status = 400, description = "Tipo não permitido ou projeto de outro funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_report(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<StaffOrAdmin>,
    Json(payload): Json<CreateReportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .report_service
        .create_report(&guard.user, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(report)))
}

// GET /api/admin/reports
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    tag = "Reports",
    responses((status = 200, description = "Todos os relatórios", body = Vec<ReportListItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_reports(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let reports = app_state
        .report_service
        .list_reports()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(reports))
}

// PUT /api/admin/reports/{id}
#[utoipa::path(
    put,
    path = "/api/admin/reports/{id}",
    tag = "Reports",
    request_body = UpdateReportPayload,
    params(("id" = Uuid, Path, description = "ID do relatório")),
    responses(
        (status = 200, description = "Relatório atualizado", body = Report),
        (status = 404, description = "Relatório não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_report(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .report_service
        .update_report(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(report))
}

// DELETE /api/admin/reports/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/reports/{id}",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "ID do relatório")),
    responses((status = 204, description = "Relatório removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_report(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .report_service
        .delete_report(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: ATIVIDADES DE VENDA
// =============================================================================

// GET /api/admin/activities
#[utoipa::path(
    get,
    path = "/api/admin/activities",
    tag = "Reports",
    responses((status = 200, description = "Todas as atividades", body = Vec<SalesActivity>)),
    security(("api_jwt" = []))
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let activities = app_state
        .report_service
        .list_activities()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(activities))
}

// POST /api/activities (multipart)
#[utoipa::path(
    post,
    path = "/api/activities",
    tag = "Reports",
    request_body(content = ActivityForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Atividade registrada", body = SalesActivity),
        (status = 400, description = "Dados ou imagem inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_activity(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<StaffOrAdmin>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormFields::read(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let input = ActivityInput::from_form(&form);
    input
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let activity = app_state
        .report_service
        .create_activity(&guard.user, &input, form.image.as_ref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(activity)))
}

// DELETE /api/activities/{id}
#[utoipa::path(
    delete,
    path = "/api/activities/{id}",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "ID da atividade")),
    responses(
        (status = 204, description = "Atividade removida"),
        (status = 404, description = "Atividade não encontrada (ou de outro autor)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_activity(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<StaffOrAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .report_service
        .delete_activity(&guard.user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: ÁREA DE TRABALHO DO FUNCIONÁRIO
// =============================================================================

// GET /api/staff/workspace
#[utoipa::path(
    get,
    path = "/api/staff/workspace",
    tag = "Staff",
    responses((status = 200, description = "Meus relatórios e atividades", body = Workspace)),
    security(("api_jwt" = []))
)]
pub async fn workspace(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<EmployeeOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let workspace = app_state
        .report_service
        .workspace(&guard.user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(workspace))
}

// DELETE /api/staff/reports/{id}
#[utoipa::path(
    delete,
    path = "/api/staff/reports/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do relatório")),
    responses(
        (status = 204, description = "Relatório removido"),
        (status = 404, description = "Relatório não encontrado (ou de outro autor)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_own_report(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<EmployeeOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .report_service
        .delete_own_report(&guard.user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
