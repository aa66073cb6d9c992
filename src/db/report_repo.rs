// src/db/report_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::{
    common::error::AppError,
    models::report::{RecentCustomer, RevenueRow},
};

// Linha agregada por mês vinda do SQL (rótulo de 3 letras + total).
#[derive(Debug, Clone, FromRow)]
pub struct MonthCountRow {
    pub month: String,
    pub total: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct MonthRateRow {
    pub month: String,
    pub rate: f64,
}

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Novos clientes por mês-calendário dentro da janela. O reagrupamento em
    // baldes de 30 dias acontece no serviço.
    pub async fn monthly_new_customers(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MonthCountRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthCountRow>(
            "SELECT to_char(created_at, 'Mon') AS month, COUNT(*) AS total \
             FROM customers \
             WHERE created_at BETWEEN $1 AND $2 \
             GROUP BY to_char(created_at, 'YYYY-MM'), to_char(created_at, 'Mon') \
             ORDER BY to_char(created_at, 'YYYY-MM') ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn monthly_bookings(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MonthCountRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthCountRow>(
            "SELECT to_char(created_at, 'Mon') AS month, COUNT(*) AS total \
             FROM reservations \
             WHERE created_at BETWEEN $1 AND $2 \
             GROUP BY to_char(created_at, 'YYYY-MM'), to_char(created_at, 'Mon') \
             ORDER BY to_char(created_at, 'YYYY-MM') ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Receita vem como linhas cruas e é somada em código, de propósito:
    // exclui reservas canceladas e pagamentos cancelados/pendentes.
    pub async fn revenue_rows(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RevenueRow>, AppError> {
        let rows = sqlx::query_as::<_, RevenueRow>(
            "SELECT created_at, booking_amount \
             FROM reservations \
             WHERE created_at BETWEEN $1 AND $2 \
               AND LOWER(fulfillment_status::text) != 'cancelled' \
               AND LOWER(payment_status::text) NOT IN ('cancelled', 'pending')",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Média mensal de ocupação (%) a partir dos registros diários.
    pub async fn monthly_occupancy(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MonthRateRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthRateRow>(
            "SELECT to_char(date, 'Mon') AS month, \
                    AVG(occupied_rooms::float8 / NULLIF(total_rooms, 0) * 100)::float8 AS rate \
             FROM room_occupancy \
             WHERE date BETWEEN $1::date AND $2::date \
             GROUP BY to_char(date, 'YYYY-MM'), to_char(date, 'Mon') \
             ORDER BY to_char(date, 'YYYY-MM') ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn recent_customers(&self, limit: i64) -> Result<Vec<RecentCustomer>, AppError> {
        let rows = sqlx::query_as::<_, RecentCustomer>(
            "SELECT customer_id, full_name AS name, email, phone, status, \
                    to_char(created_at, 'YYYY-MM-DD') AS signup_date \
             FROM customers \
             ORDER BY created_at DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn total_bookings_cost(&self) -> Result<Decimal, AppError> {
        let total: Decimal =
            sqlx::query_scalar("SELECT COALESCE(SUM(booking_amount), 0) FROM reservations")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    pub async fn total_reservations(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn pending_reservations(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE fulfillment_status = 'Pending'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn total_customers(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn active_customers(&self) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE status = 'Active'")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    // Métricas do painel do próprio cliente.
    pub async fn customer_total_spent(&self, user_id: i32) -> Result<Decimal, AppError> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(booking_amount), 0) FROM reservations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn customer_upcoming_count(&self, user_id: i32) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE user_id = $1 AND checkin_date >= CURRENT_DATE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn customer_past_count(&self, user_id: i32) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE user_id = $1 AND checkout_date < CURRENT_DATE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
