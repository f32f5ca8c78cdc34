// src/handlers/broadcasts.rs

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{error::ApiError, form::FormFields},
    config::AppState,
    middleware::{
        i18n::Locale,
        role::{AdminOnly, CustomerOnly, RequireRole},
    },
    models::broadcast::{Broadcast, BroadcastForm, BroadcastInput, SubscriptionState},
};

// =============================================================================
//  ÁREA 1: PUBLICAÇÃO (ADMIN)
// =============================================================================

// GET /api/admin/broadcasts
#[utoipa::path(
    get,
    path = "/api/admin/broadcasts",
    tag = "Broadcasts",
    responses((status = 200, description = "Todos os anúncios, inclusive agendados", body = Vec<Broadcast>)),
    security(("api_jwt" = []))
)]
pub async fn list_broadcasts(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let broadcasts = app_state
        .broadcast_service
        .list_all()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(broadcasts))
}

// POST /api/admin/broadcasts (multipart)
#[utoipa::path(
    post,
    path = "/api/admin/broadcasts",
    tag = "Broadcasts",
    request_body(content = BroadcastForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Anúncio criado", body = Broadcast),
        (status = 400, description = "Dados inválidos ou agendamento no passado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_broadcast(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminOnly>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormFields::read(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let broadcast = app_state
        .broadcast_service
        .create(&admin.user, &BroadcastInput::from_form(&form), form.image.as_ref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(broadcast)))
}

// PUT /api/admin/broadcasts/{id} (multipart)
#[utoipa::path(
    put,
    path = "/api/admin/broadcasts/{id}",
    tag = "Broadcasts",
    request_body(content = BroadcastForm, content_type = "multipart/form-data"),
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Anúncio atualizado", body = Broadcast),
        (status = 404, description = "Anúncio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_broadcast(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormFields::read(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let broadcast = app_state
        .broadcast_service
        .update(id, &BroadcastInput::from_form(&form), form.image.as_ref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(broadcast))
}

// DELETE /api/admin/broadcasts/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/broadcasts/{id}",
    tag = "Broadcasts",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses((status = 204, description = "Anúncio removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_broadcast(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .broadcast_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: ASSINATURA (CLIENTE)
// =============================================================================

// POST /api/client/subscription/toggle
#[utoipa::path(
    post,
    path = "/api/client/subscription/toggle",
    tag = "Client",
    responses((status = 200, description = "Novo estado da assinatura", body = SubscriptionState)),
    security(("api_jwt" = []))
)]
pub async fn toggle_subscription(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<CustomerOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let state = app_state
        .broadcast_service
        .toggle_subscription(&guard.user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(state))
}

// GET /api/client/broadcasts
#[utoipa::path(
    get,
    path = "/api/client/broadcasts",
    tag = "Client",
    responses((status = 200, description = "Anúncios publicados (vazio sem assinatura)", body = Vec<Broadcast>)),
    security(("api_jwt" = []))
)]
pub async fn visible_broadcasts(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<CustomerOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let broadcasts = app_state
        .broadcast_service
        .visible_for(&guard.user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(broadcasts))
}
