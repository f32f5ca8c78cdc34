// src/handlers/customers.rs

use axum::{
    extract::{Path, Query, State},
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
        customer::{
            AddTagPayload, BulkDeletePayload, ContactPayload, CreateCustomerPayload,
            CustomerContact, CustomerDetail, CustomerFilter, CustomerSummary, DeletedCount,
            SetCustomerTypePayload, Tag, TagPayload, UpdateCustomerPayload,
        },
    },
};

// =============================================================================
//  ÁREA 1: CLIENTES
// =============================================================================

// GET /api/admin/customers
#[utoipa::path(
    get,
    path = "/api/admin/customers",
    tag = "Customers",
    params(CustomerFilter),
    responses((status = 200, description = "Clientes filtrados", body = Vec<CustomerSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Query(filter): Query<CustomerFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let customers = app_state
        .customer_service
        .list_customers(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(customers))
}

// GET /api/admin/customers/{id}
#[utoipa::path(
    get,
    path = "/api/admin/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Ficha completa do cliente", body = CustomerDetail),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .customer_service
        .get_customer_detail(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// POST /api/admin/customers
#[utoipa::path(
    post,
    path = "/api/admin/customers",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = User),
        (status = 409, description = "E-mail já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .customer_service
        .create_customer(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/admin/customers/{id}
#[utoipa::path(
    put,
    path = "/api/admin/customers/{id}",
    tag = "Customers",
    request_body = UpdateCustomerPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = User),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .customer_service
        .update_customer(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(customer))
}

// DELETE /api/admin/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido (em cascata)"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .customer_service
        .delete_customer(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/admin/customers/bulk-delete
#[utoipa::path(
    post,
    path = "/api/admin/customers/bulk-delete",
    tag = "Customers",
    request_body = BulkDeletePayload,
    responses((status = 200, description = "Quantidade removida", body = DeletedCount)),
    security(("api_jwt" = []))
)]
pub async fn bulk_delete_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Json(payload): Json<BulkDeletePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = app_state
        .customer_service
        .bulk_delete(&payload.ids)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(DeletedCount { deleted }))
}

// PUT /api/admin/customers/{id}/type
#[utoipa::path(
    put,
    path = "/api/admin/customers/{id}/type",
    tag = "Customers",
    request_body = SetCustomerTypePayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Tipo definido", body = User),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_customer_type(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetCustomerTypePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .customer_service
        .set_customer_type(id, payload.customer_type)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(customer))
}

// =============================================================================
//  ÁREA 2: CARTÃO DE CONTATO
// =============================================================================

// PUT /api/admin/customers/{id}/contact
#[utoipa::path(
    put,
    path = "/api/admin/customers/{id}/contact",
    tag = "Customers",
    request_body = ContactPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Contato salvo", body = CustomerContact),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contact = app_state
        .customer_service
        .save_contact(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(contact))
}

// DELETE /api/admin/customers/{id}/contact
#[utoipa::path(
    delete,
    path = "/api/admin/customers/{id}/contact",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Contato removido"),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .customer_service
        .delete_contact(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: ETIQUETAS
// =============================================================================

// GET /api/admin/tags
#[utoipa::path(
    get,
    path = "/api/admin/tags",
    tag = "Customers",
    responses((status = 200, description = "Etiquetas", body = Vec<Tag>)),
    security(("api_jwt" = []))
)]
pub async fn list_tags(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = app_state
        .customer_service
        .list_tags()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tags))
}

// POST /api/admin/tags
#[utoipa::path(
    post,
    path = "/api/admin/tags",
    tag = "Customers",
    request_body = TagPayload,
    responses(
        (status = 201, description = "Etiqueta criada", body = Tag),
        (status = 409, description = "Nome já usado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tag(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Json(payload): Json<TagPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tag = app_state
        .customer_service
        .create_tag(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tag)))
}

// PUT /api/admin/tags/{id}
#[utoipa::path(
    put,
    path = "/api/admin/tags/{id}",
    tag = "Customers",
    request_body = TagPayload,
    params(("id" = Uuid, Path, description = "ID da etiqueta")),
    responses(
        (status = 200, description = "Etiqueta atualizada", body = Tag),
        (status = 404, description = "Etiqueta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tag(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TagPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tag = app_state
        .customer_service
        .update_tag(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tag))
}

// DELETE /api/admin/tags/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/tags/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID da etiqueta")),
    responses((status = 204, description = "Etiqueta removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_tag(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .customer_service
        .delete_tag(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/admin/customers/{id}/tags
#[utoipa::path(
    post,
    path = "/api/admin/customers/{id}/tags",
    tag = "Customers",
    request_body = AddTagPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, description = "Etiquetas do cliente", body = Vec<Tag>)),
    security(("api_jwt" = []))
)]
pub async fn add_customer_tag(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddTagPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = app_state
        .customer_service
        .add_tag(id, payload.tag_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tags))
}

// DELETE /api/admin/customers/{id}/tags/{tag_id}
#[utoipa::path(
    delete,
    path = "/api/admin/customers/{id}/tags/{tag_id}",
    tag = "Customers",
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("tag_id" = Uuid, Path, description = "ID da etiqueta")
    ),
    responses((status = 204, description = "Etiqueta retirada do cliente")),
    security(("api_jwt" = []))
)]
pub async fn remove_customer_tag(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
    Path((id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .customer_service
        .remove_tag(id, tag_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
