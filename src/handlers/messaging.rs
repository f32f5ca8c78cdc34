// src/handlers/messaging.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{error::ApiError, form::FormFields},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        role::{CustomerOnly, RequireRole},
    },
    models::conversation::{ConversationWithMessages, Message, MessageForm, MessagesQuery},
};

// POST /api/conversations/{id}/messages (multipart)
#[utoipa::path(
    post,
    path = "/api/conversations/{id}/messages",
    tag = "Messaging",
    request_body(content = MessageForm, content_type = "multipart/form-data"),
    params(("id" = Uuid, Path, description = "ID da conversa")),
    responses(
        (status = 201, description = "Mensagem enviada", body = Message),
        (status = 400, description = "Texto e imagem vazios"),
        (status = 403, description = "Não participa desta conversa")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormFields::read(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state
        .messaging_service
        .send(&user, id, &form.raw("content"), form.image.as_ref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(message)))
}

// GET /api/conversations/{id}/messages?after=...
#[utoipa::path(
    get,
    path = "/api/conversations/{id}/messages",
    tag = "Messaging",
    params(
        ("id" = Uuid, Path, description = "ID da conversa"),
        MessagesQuery
    ),
    responses(
        (status = 200, description = "Mensagens em ordem crescente", body = Vec<Message>),
        (status = 403, description = "Não participa desta conversa")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = app_state
        .messaging_service
        .list_messages(&user, id, query.after)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(messages))
}

// GET /api/client/conversations
#[utoipa::path(
    get,
    path = "/api/client/conversations",
    tag = "Client",
    responses(
        (status = 200, description = "Minhas conversas com mensagens", body = Vec<ConversationWithMessages>),
        (status = 403, description = "Apenas clientes POTENTIAL")
    ),
    security(("api_jwt" = []))
)]
pub async fn my_conversations(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<CustomerOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let conversations = app_state
        .messaging_service
        .my_conversations(&guard.user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(conversations))
}
