// src/handlers/uploads.rs
//
// Serve as imagens gravadas pelo backend de disco/memória. Com S3 a URL pública
// aponta direto para o bucket e esta rota não é usada.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    common::error::AppError,
    config::AppState,
    services::storage::content_type_for,
};

// GET /uploads/{*key}
pub async fn serve_upload(State(app_state): State<AppState>, Path(key): Path<String>) -> Response {
    if key.split('/').any(|segment| segment == "..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    match app_state.storage.read(&key).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type_for(&key))], bytes).into_response(),
        Err(AppError::Storage(e)) if e.kind() == opendal::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => e.into_response(),
    }
}

// GET /api/health
pub async fn health() -> &'static str {
    "OK"
}
