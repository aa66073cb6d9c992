// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::report::{MonthlyAmount, MonthlyCount, MonthlyRate, RecentCustomer, ReportData},
    services::report::DEFAULT_WINDOW_MONTHS,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct WindowQuery {
    // Tamanho da janela em "meses" de 30 dias (padrão 6).
    pub months: Option<i64>,
}

impl WindowQuery {
    fn months(&self) -> i64 {
        match self.months {
            Some(m) if m > 0 => m,
            _ => DEFAULT_WINDOW_MONTHS,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/reports/customer-growth",
    tag = "Reports",
    params(WindowQuery),
    responses((status = 200, description = "Novos clientes por mês", body = Vec<MonthlyCount>)),
    security(("api_jwt" = []))
)]
pub async fn customer_growth(
    State(app_state): State<AppState>,
    Query(window): Query<WindowQuery>,
) -> Json<Vec<MonthlyCount>> {
    Json(app_state.report_service.customer_growth(window.months()).await)
}

#[utoipa::path(
    get,
    path = "/api/reports/booking-trends",
    tag = "Reports",
    params(WindowQuery),
    responses((status = 200, description = "Reservas por mês", body = Vec<MonthlyCount>)),
    security(("api_jwt" = []))
)]
pub async fn booking_trends(
    State(app_state): State<AppState>,
    Query(window): Query<WindowQuery>,
) -> Json<Vec<MonthlyCount>> {
    Json(app_state.report_service.booking_trends(window.months()).await)
}

#[utoipa::path(
    get,
    path = "/api/reports/revenue-trends",
    tag = "Reports",
    params(WindowQuery),
    responses((status = 200, description = "Receita por mês", body = Vec<MonthlyAmount>)),
    security(("api_jwt" = []))
)]
pub async fn revenue_trends(
    State(app_state): State<AppState>,
    Query(window): Query<WindowQuery>,
) -> Json<Vec<MonthlyAmount>> {
    Json(app_state.report_service.revenue_trends(window.months()).await)
}

#[utoipa::path(
    get,
    path = "/api/reports/occupancy",
    tag = "Reports",
    params(WindowQuery),
    responses((status = 200, description = "Ocupação média por mês", body = Vec<MonthlyRate>)),
    security(("api_jwt" = []))
)]
pub async fn occupancy_trends(
    State(app_state): State<AppState>,
    Query(window): Query<WindowQuery>,
) -> Json<Vec<MonthlyRate>> {
    Json(app_state.report_service.occupancy_trends(window.months()).await)
}

#[utoipa::path(
    get,
    path = "/api/reports/recent-customers",
    tag = "Reports",
    responses((status = 200, description = "Últimos clientes cadastrados", body = Vec<RecentCustomer>)),
    security(("api_jwt" = []))
)]
pub async fn recent_customers(State(app_state): State<AppState>) -> Json<Vec<RecentCustomer>> {
    Json(app_state.report_service.recent_customers().await)
}

// O conjunto completo que as telas de relatório consomem de uma vez.
#[utoipa::path(
    get,
    path = "/api/reports/full",
    tag = "Reports",
    responses((status = 200, description = "Relatório completo", body = ReportData)),
    security(("api_jwt" = []))
)]
pub async fn full_report(State(app_state): State<AppState>) -> Json<ReportData> {
    Json(app_state.report_service.report_data().await)
}

#[utoipa::path(
    get,
    path = "/api/reports/export/csv",
    tag = "Reports",
    responses((status = 200, description = "Relatório em CSV")),
    security(("api_jwt" = []))
)]
pub async fn export_csv(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (filename, bytes) = app_state.document_service.performance_csv().await?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, bytes))
}

#[utoipa::path(
    get,
    path = "/api/reports/export/pdf",
    tag = "Reports",
    responses((status = 200, description = "Relatório em PDF")),
    security(("api_jwt" = []))
)]
pub async fn export_pdf(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (filename, bytes) = app_state.document_service.performance_pdf().await?;
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, bytes))
}
