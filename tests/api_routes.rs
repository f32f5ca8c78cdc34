// Testes de roteamento que não tocam o banco: o pool é preguiçoso e nenhuma
// destas requisições chega a abrir conexão.

mod helpers;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

fn test_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .expect("lazy pool");
    helpers::test_router(helpers::test_state(pool))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    (status, bytes.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn health_answers_ok() {
    let (status, body) = send(test_app(), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    for uri in [
        "/api/users/me",
        "/api/admin/projects",
        "/api/staff/clients",
        "/api/client/broadcasts",
        "/api/dashboard/admin",
    ] {
        let (status, body) = send(test_app(), get(uri)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);

        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body["error"], "Missing or invalid authentication token.");
    }
}

#[tokio::test]
async fn malformed_token_is_rejected_before_any_lookup() {
    let request = Request::builder()
        .uri("/api/admin/customers")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .expect("request");

    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_validation_is_translated_per_locale() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9")
        .body(Body::from(
            json!({ "name": "A", "email": "not-an-email", "password": "123" }).to_string(),
        ))
        .expect("request");

    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(body["error"], "Um ou mais campos são inválidos.");
    for field in ["name", "email", "password"] {
        assert!(body["details"][field].is_array(), "sem detalhe para {}", field);
    }
}

#[tokio::test]
async fn missing_upload_is_not_found() {
    let (status, _) = send(test_app(), get("/uploads/products/none.png")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_paths_cannot_climb_out_of_the_bucket() {
    let (status, _) = send(test_app(), get("/uploads/products/../secret.png")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(test_app(), get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);

    let doc: Value = serde_json::from_slice(&body).expect("json");
    assert!(doc["paths"]["/api/client/products/{id}/apply"].is_object());
}
