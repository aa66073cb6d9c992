// src/db/reservation_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::reservation::{
        FulfillmentStatus, PaymentStatus, Reservation, ReservationChanges, ReservationListRow,
    },
};

const RESERVATION_COLUMNS: &str = "reservation_id, user_id, customer_id, guest_name, room_type, \
     checkin_date, checkout_date, booking_amount, payment_status, fulfillment_status, \
     created_at, updated_at";

#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem da recepção, com o nome do cliente resolvido via LEFT JOIN
    // ('N/A' quando a reserva não tem cliente vinculado).
    pub async fn get_reservations(
        &self,
        status: Option<FulfillmentStatus>,
    ) -> Result<Vec<ReservationListRow>, AppError> {
        let base = "SELECT r.reservation_id, r.guest_name, r.room_type, r.checkin_date, \
                    r.checkout_date, r.booking_amount, r.payment_status, r.fulfillment_status, \
                    COALESCE(c.full_name, 'N/A') AS customer_name \
                    FROM reservations r \
                    LEFT JOIN customers c ON r.customer_id = c.customer_id";

        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, ReservationListRow>(&format!(
                    "{base} WHERE r.fulfillment_status = $1 ORDER BY r.checkin_date DESC"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ReservationListRow>(&format!(
                    "{base} ORDER BY r.checkin_date DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn get_by_user(&self, user_id: i32) -> Result<Vec<Reservation>, AppError> {
        let rows = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE user_id = $1 ORDER BY checkin_date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, reservation_id: &str) -> Result<Option<Reservation>, AppError> {
        let maybe = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1"
        ))
        .bind(reservation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    // Próximo valor da sequência de reservas.
    pub async fn next_sequence_value<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let value: i64 = sqlx::query_scalar("SELECT nextval('reservation_seq')")
            .fetch_one(executor)
            .await?;
        Ok(value)
    }

    // Verificação de unicidade mantida do fluxo legado: se o ID calculado já
    // existir, o chamador cai no plano B baseado em timestamp.
    pub async fn id_exists<'e, E>(&self, executor: E, reservation_id: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE reservation_id = $1")
                .bind(reservation_id)
                .fetch_one(executor)
                .await?;
        Ok(count > 0)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_reservation<'e, E>(
        &self,
        executor: E,
        reservation_id: &str,
        user_id: i32,
        customer_id: Option<&str>,
        guest_name: &str,
        room_type: &str,
        checkin_date: NaiveDate,
        checkout_date: NaiveDate,
        booking_amount: Decimal,
        payment_status: PaymentStatus,
        fulfillment_status: FulfillmentStatus,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "INSERT INTO reservations \
             (reservation_id, user_id, customer_id, guest_name, room_type, \
              checkin_date, checkout_date, booking_amount, payment_status, fulfillment_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(reservation_id)
        .bind(user_id)
        .bind(customer_id)
        .bind(guest_name)
        .bind(room_type)
        .bind(checkin_date)
        .bind(checkout_date)
        .bind(booking_amount)
        .bind(payment_status)
        .bind(fulfillment_status)
        .fetch_one(executor)
        .await?;

        Ok(reservation)
    }

    // Atualização parcial: apenas campos presentes entram no SQL.
    pub async fn update_reservation(
        &self,
        reservation_id: &str,
        changes: &ReservationChanges,
    ) -> Result<bool, AppError> {
        if changes.is_empty() {
            return Err(AppError::EmptyUpdate);
        }

        let mut builder = build_reservation_update(reservation_id, changes);
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    // Cancelamento lógico: os dois eixos de status viram 'Cancelled', o
    // registro permanece.
    pub async fn cancel_reservation(&self, reservation_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE reservations \
             SET payment_status = 'Cancelled', fulfillment_status = 'Cancelled', \
                 updated_at = NOW() \
             WHERE reservation_id = $1",
        )
        .bind(reservation_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // Remoção física, mantida apenas para o caminho administrativo.
    pub async fn delete_reservation(&self, reservation_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(reservation_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn distinct_room_types(&self) -> Result<Vec<String>, AppError> {
        let types: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT room_type FROM reservations WHERE room_type IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(types)
    }
}

fn build_reservation_update<'a>(
    reservation_id: &'a str,
    changes: &'a ReservationChanges,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE reservations SET ");
    let mut fields = builder.separated(", ");

    if let Some(guest_name) = &changes.guest_name {
        fields.push("guest_name = ").push_bind_unseparated(guest_name);
    }
    if let Some(room_type) = &changes.room_type {
        fields.push("room_type = ").push_bind_unseparated(room_type);
    }
    if let Some(checkin) = changes.checkin_date {
        fields.push("checkin_date = ").push_bind_unseparated(checkin);
    }
    if let Some(checkout) = changes.checkout_date {
        fields.push("checkout_date = ").push_bind_unseparated(checkout);
    }
    if let Some(amount) = changes.booking_amount {
        fields.push("booking_amount = ").push_bind_unseparated(amount);
    }
    if let Some(payment) = changes.payment_status {
        fields.push("payment_status = ").push_bind_unseparated(payment);
    }
    if let Some(fulfillment) = changes.fulfillment_status {
        fields
            .push("fulfillment_status = ")
            .push_bind_unseparated(fulfillment);
    }
    fields.push("updated_at = NOW()");

    builder.push(" WHERE reservation_id = ").push_bind(reservation_id);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    // Propriedade central do contrato de atualização: mudar só o status de
    // pagamento não pode tocar em quarto, datas ou valor.
    #[test]
    fn atualizar_pagamento_nao_toca_nos_demais_campos() {
        let changes = ReservationChanges {
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        };
        let sql = build_reservation_update("RES00001", &changes).into_sql();

        assert!(sql.contains("payment_status = "));
        assert!(!sql.contains("room_type"));
        assert!(!sql.contains("checkin_date"));
        assert!(!sql.contains("checkout_date"));
        assert!(!sql.contains("booking_amount"));
        assert!(!sql.contains("guest_name"));
        assert!(!sql.contains("fulfillment_status"));
    }

    #[test]
    fn update_completo_inclui_todos_os_campos() {
        let changes = ReservationChanges {
            guest_name: Some("Ana".into()),
            room_type: Some("Suite".into()),
            checkin_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            checkout_date: NaiveDate::from_ymd_opt(2025, 3, 3),
            booking_amount: Some(Decimal::from(200)),
            payment_status: Some(PaymentStatus::Pending),
            fulfillment_status: Some(FulfillmentStatus::Confirmed),
        };
        let sql = build_reservation_update("RES00002", &changes).into_sql();

        for col in [
            "guest_name",
            "room_type",
            "checkin_date",
            "checkout_date",
            "booking_amount",
            "payment_status",
            "fulfillment_status",
        ] {
            assert!(sql.contains(&format!("{col} = ")), "faltou {col}");
        }
        assert!(sql.ends_with("WHERE reservation_id = $8"));
    }
}
