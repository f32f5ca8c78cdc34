// src/handlers/client.rs

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{field_error, ApiError, AppError},
        form::FormFields,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        role::{CustomerOnly, RequireRole},
    },
    models::{
        conversation::MessageForm,
        product::ApplyProductPayload,
        project::{Project, ProjectWithQuotes},
    },
    services::messaging_service::message_image_folder,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImage {
    pub url: String,
}

// POST /api/client/products/{id}/apply
#[utoipa::path(
    post,
    path = "/api/client/products/{id}/apply",
    tag = "Client",
    request_body = ApplyProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 201, description = "Pedido registrado (projeto PENDING)", body = Project),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn apply_for_product(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<CustomerOnly>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ApplyProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .client_service
        .apply_for_product(&guard.user, product_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// GET /api/client/applications
#[utoipa::path(
    get,
    path = "/api/client/applications",
    tag = "Client",
    responses((status = 200, description = "Meus pedidos com orçamentos", body = Vec<ProjectWithQuotes>)),
    security(("api_jwt" = []))
)]
pub async fn my_applications(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<CustomerOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let applications = app_state
        .client_service
        .my_applications(&guard.user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(applications))
}

// POST /api/uploads/image (multipart, qualquer usuário logado)
#[utoipa::path(
    post,
    path = "/api/uploads/image",
    tag = "Uploads",
    request_body(content = MessageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Imagem armazenada", body = UploadedImage),
        (status = 400, description = "Arquivo ausente ou formato inválido"),
        (status = 413, description = "Imagem maior que 5MB")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_image(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormFields::read(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let file = form
        .image
        .as_ref()
        .ok_or_else(|| field_error("image", "image_required").to_api_error(&locale, &app_state.i18n_store))?;

    let url = app_state
        .storage
        .upload_image(&message_image_folder(user.id, Utc::now()), file)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(UploadedImage { url })))
}
