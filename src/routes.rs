// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    common::form::MAX_IMAGE_BYTES,
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::auth_guard,
};

// Imagem de até 5MB mais os campos de texto do formulário.
const MAX_BODY_BYTES: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// Lista vazia libera qualquer origem (desenvolvimento).
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT_LANGUAGE]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if allowed.is_empty() {
        base.allow_origin(Any)
    } else {
        tracing::info!("CORS restrito a {} origem(ns)", allowed.len());
        base.allow_origin(AllowOrigin::list(allowed))
    }
}

pub fn router(app_state: AppState) -> Router {
    // --- Rotas públicas ---
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/init-admin", post(handlers::auth::init_admin))
        .route("/otp/request", post(handlers::auth::request_otp))
        .route("/otp/verify", post(handlers::auth::verify_otp))
        .route("/google", post(handlers::auth::google_sign_in));

    let catalog_routes = Router::new()
        .route("/", get(handlers::products::list_public_products))
        .route("/{id}", get(handlers::products::get_public_product));

    // --- Administração (o papel é checado em cada handler) ---
    let admin_routes = Router::new()
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route("/customers/bulk-delete", post(handlers::customers::bulk_delete_customers))
        .route(
            "/customers/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route("/customers/{id}/type", put(handlers::customers::set_customer_type))
        .route(
            "/customers/{id}/contact",
            put(handlers::customers::save_contact).delete(handlers::customers::delete_contact),
        )
        .route("/customers/{id}/tags", post(handlers::customers::add_customer_tag))
        .route(
            "/customers/{id}/tags/{tag_id}",
            delete(handlers::customers::remove_customer_tag),
        )
        .route(
            "/tags",
            get(handlers::customers::list_tags).post(handlers::customers::create_tag),
        )
        .route(
            "/tags/{id}",
            put(handlers::customers::update_tag).delete(handlers::customers::delete_tag),
        )
        .route(
            "/employees",
            get(handlers::employees::list_employees).post(handlers::employees::create_employee),
        )
        .route(
            "/employees/{id}",
            put(handlers::employees::update_employee).delete(handlers::employees::delete_employee),
        )
        .route(
            "/products",
            get(handlers::products::list_all_products).post(handlers::products::create_product),
        )
        .route(
            "/products/{id}",
            put(handlers::products::update_product).delete(handlers::products::delete_product),
        )
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/projects/{id}",
            put(handlers::projects::update_project).delete(handlers::projects::delete_project),
        )
        .route("/projects/{id}/assignee", put(handlers::projects::assign_employee))
        .route("/projects/{id}/deadline", put(handlers::projects::set_deadline))
        .route("/reports", get(handlers::reports::list_reports))
        .route(
            "/reports/{id}",
            put(handlers::reports::update_report).delete(handlers::reports::delete_report),
        )
        .route("/activities", get(handlers::reports::list_activities))
        .route(
            "/broadcasts",
            get(handlers::broadcasts::list_broadcasts).post(handlers::broadcasts::create_broadcast),
        )
        .route(
            "/broadcasts/{id}",
            put(handlers::broadcasts::update_broadcast)
                .delete(handlers::broadcasts::delete_broadcast),
        );

    // --- Funcionário ---
    let staff_routes = Router::new()
        .route("/clients", get(handlers::staff::my_clients))
        .route("/clients/{id}", get(handlers::staff::client_detail))
        .route("/clients/{id}/projects", post(handlers::staff::create_client_project))
        .route("/workspace", get(handlers::reports::workspace))
        .route("/reports/{id}", delete(handlers::reports::delete_own_report));

    // --- Cliente ---
    let client_routes = Router::new()
        .route("/products/{id}/apply", post(handlers::client::apply_for_product))
        .route("/applications", get(handlers::client::my_applications))
        .route("/conversations", get(handlers::messaging::my_conversations))
        .route("/subscription/toggle", post(handlers::broadcasts::toggle_subscription))
        .route("/broadcasts", get(handlers::broadcasts::visible_broadcasts));

    let dashboard_routes = Router::new()
        .route("/admin", get(handlers::dashboard::admin_dashboard))
        .route("/employee", get(handlers::dashboard::employee_dashboard))
        .route("/customer", get(handlers::dashboard::customer_dashboard));

    // Tudo aqui exige token válido
    let protected_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        .nest("/admin", admin_routes)
        .nest("/staff", staff_routes)
        .nest("/client", client_routes)
        .nest("/dashboard", dashboard_routes)
        .route("/projects/{id}/toggle-completion", post(handlers::projects::toggle_completion))
        .route("/projects/{id}/quotes", post(handlers::projects::add_quote))
        .route("/quotes/{id}/pdf", get(handlers::projects::quote_pdf))
        .route("/reports", post(handlers::reports::create_report))
        .route("/activities", post(handlers::reports::create_activity))
        .route("/activities/{id}", delete(handlers::reports::delete_activity))
        .route(
            "/conversations/{id}/messages",
            get(handlers::messaging::list_messages).post(handlers::messaging::send_message),
        )
        .route("/uploads/image", post(handlers::client::upload_image))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::uploads::health))
        .nest("/auth", auth_routes)
        .nest("/products", catalog_routes)
        .merge(protected_routes);

    let cors = cors_layer(&app_state.config.cors_origins);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .route("/uploads/{*key}", get(handlers::uploads::serve_upload))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
