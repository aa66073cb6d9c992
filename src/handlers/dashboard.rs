// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::report::{CustomerOverview, DashboardOverview},
};

// Cards do painel administrativo. Em falha de consulta os números saem
// zerados — painel degradado, nunca um erro para a tela.
#[utoipa::path(
    get,
    path = "/api/dashboard/overview",
    tag = "Dashboard",
    responses((status = 200, description = "Resumo geral", body = DashboardOverview)),
    security(("api_jwt" = []))
)]
pub async fn overview(State(app_state): State<AppState>) -> Json<DashboardOverview> {
    Json(app_state.report_service.overview().await)
}

// Cards do painel do próprio cliente autenticado.
#[utoipa::path(
    get,
    path = "/api/dashboard/me",
    tag = "Dashboard",
    responses((status = 200, description = "Resumo do cliente", body = CustomerOverview)),
    security(("api_jwt" = []))
)]
pub async fn my_overview(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Json<CustomerOverview> {
    Json(app_state.report_service.customer_overview(user.user_id).await)
}
