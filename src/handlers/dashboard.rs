// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        role::{AdminOnly, CustomerOnly, EmployeeOnly, RequireRole},
    },
    models::dashboard::{AdminDashboard, CustomerDashboard, EmployeeDashboard},
};

// GET /api/dashboard/admin
#[utoipa::path(
    get,
    path = "/api/dashboard/admin",
    tag = "Dashboard",
    responses((status = 200, description = "Projetos, estatísticas e vendas do mês", body = AdminDashboard)),
    security(("api_jwt" = []))
)]
pub async fn admin_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = app_state
        .dashboard_service
        .admin(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dashboard))
}

// GET /api/dashboard/employee
#[utoipa::path(
    get,
    path = "/api/dashboard/employee",
    tag = "Dashboard",
    responses((status = 200, description = "Meus projetos e estatísticas", body = EmployeeDashboard)),
    security(("api_jwt" = []))
)]
pub async fn employee_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<EmployeeOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = app_state
        .dashboard_service
        .employee(&guard.user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dashboard))
}

// GET /api/dashboard/customer
#[utoipa::path(
    get,
    path = "/api/dashboard/customer",
    tag = "Dashboard",
    responses((status = 200, description = "Pedidos, anúncios recentes e assinatura", body = CustomerDashboard)),
    security(("api_jwt" = []))
)]
pub async fn customer_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<CustomerOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = app_state
        .dashboard_service
        .customer(&guard.user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dashboard))
}
