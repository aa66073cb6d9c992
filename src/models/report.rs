// src/models/report.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Um ponto de uma série mensal. A ordem do Vec é a ordem dos "baldes"
// de 30 dias (não meses-calendário) — ver services::report.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    pub month: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAmount {
    pub month: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRate {
    pub month: String,
    pub rate: f64,
}

// Linha crua de receita, agrupada em código (não em SQL) de propósito.
#[derive(Debug, Clone, FromRow)]
pub struct RevenueRow {
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub booking_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentCustomer {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: crate::models::customer::AccountStatus,
    pub signup_date: String,
}

// Cards do painel administrativo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_customers: i64,
    pub active_customers: i64,
    pub total_reservations: i64,
    pub pending_reservations: i64,
    pub total_revenue: Decimal,
    // Variação percentual de novos clientes mês a mês.
    pub customer_growth_pct: f64,
}

// Cards do painel do próprio cliente.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOverview {
    pub total_spent: Decimal,
    pub upcoming_reservations: i64,
    pub past_reservations: i64,
}

// Conjunto completo que alimenta relatórios e exportações.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub new_customers: Vec<MonthlyCount>,
    pub total_customers: Vec<MonthlyCount>,
    pub revenue: Vec<MonthlyAmount>,
    pub bookings: Vec<MonthlyCount>,
    pub occupancy: Vec<MonthlyRate>,
    pub recent_customers: Vec<RecentCustomer>,
}
