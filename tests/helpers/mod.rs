#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use labelcrm::{
    config::{AppConfig, AppState},
    db::UserRepository,
    models::auth::{CustomerType, NewUser, Role, User},
    routes,
    services::{
        sms::LogSender,
        storage::{Storage, StorageBackend},
    },
};

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://localhost/unused".into(),
        database_max_connections: 1,
        jwt_secret: "test-secret".into(),
        token_ttl_days: 7,
        bind_addr: "127.0.0.1:0".into(),
        cors_origins: vec![],
        storage_backend: StorageBackend::Memory,
        public_asset_base_url: "/uploads".into(),
        sms_provider: "log".into(),
        twilio_account_sid: None,
        twilio_auth_token: None,
        twilio_phone_number: None,
        sms_default_country_code: "+852".into(),
        google_client_id: None,
        pdf_font_dir: "./fonts".into(),
    }
}

/// Estado completo sobre o pool dado, com SMS em modo log e storage em memória.
pub fn test_state(pool: PgPool) -> AppState {
    let storage = Storage::memory("/uploads").expect("memory storage");
    AppState::build(pool, test_config(), storage, Arc::new(LogSender)).expect("app state")
}

pub fn test_router(state: AppState) -> Router {
    routes::router(state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    (status, bytes.to_vec())
}

pub async fn get_with_token(app: &Router, token: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

// --- Dados ---

pub async fn insert_user(pool: &PgPool, name: &str, role: Role, customer_type: Option<CustomerType>) -> User {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    UserRepository::new(pool.clone())
        .create_user(
            pool,
            &NewUser {
                name,
                email: Some(&email),
                phone: None,
                password_hash: None,
                image: None,
                role,
                customer_type,
            },
        )
        .await
        .expect("insert user")
}

pub async fn insert_customer(pool: &PgPool, name: &str) -> User {
    insert_user(pool, name, Role::Customer, Some(CustomerType::Normal)).await
}

pub async fn insert_employee(pool: &PgPool, name: &str) -> User {
    insert_user(pool, name, Role::Employee, None).await
}

pub async fn insert_product(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO products (name, price) VALUES ($1, 10) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("insert product")
}

pub async fn customer_type_of(pool: &PgPool, id: Uuid) -> Option<CustomerType> {
    UserRepository::new(pool.clone())
        .find_by_id(id)
        .await
        .expect("find user")
        .expect("user exists")
        .customer_type
}
