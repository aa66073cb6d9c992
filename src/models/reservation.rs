// src/models/reservation.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Os dois eixos independentes de status de uma reserva.
// `Cancelled` é terminal nos dois.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "fulfillment_status")]
pub enum FulfillmentStatus {
    Confirmed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub reservation_id: String,
    pub user_id: i32,
    pub customer_id: Option<String>,
    pub guest_name: String,
    // VARCHAR no banco: o legado aceita tipos fora do catálogo ("Standard").
    pub room_type: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub booking_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem da recepção, com o nome do cliente resolvido via JOIN.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListRow {
    pub reservation_id: String,
    pub guest_name: String,
    pub room_type: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub booking_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub customer_name: String,
}

// Criação de reserva. Datas e valor chegam como texto livre (os formatos
// aceitos estão em services::booking_rules) e são normalizados no serviço.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReservationPayload {
    #[validate(length(min = 1, message = "O tipo de quarto é obrigatório."))]
    pub room_type: String,
    #[validate(length(min = 1, message = "A data de check-in é obrigatória."))]
    pub checkin: String,
    #[validate(length(min = 1, message = "A data de check-out é obrigatória."))]
    pub checkout: String,
    #[validate(length(min = 1, message = "O valor da reserva é obrigatório."))]
    pub amount: String,
    pub guest_name: Option<String>,
    pub customer_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub fulfillment_status: Option<FulfillmentStatus>,
}

// Atualização parcial: apenas os campos presentes são persistidos.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationPayload {
    pub guest_name: Option<String>,
    pub room_type: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub amount: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub fulfillment_status: Option<FulfillmentStatus>,
}

impl UpdateReservationPayload {
    pub fn is_empty(&self) -> bool {
        self.guest_name.is_none()
            && self.room_type.is_none()
            && self.checkin.is_none()
            && self.checkout.is_none()
            && self.amount.is_none()
            && self.payment_status.is_none()
            && self.fulfillment_status.is_none()
    }
}

// Campos já normalizados, prontos para o UPDATE parcial.
#[derive(Debug, Default)]
pub struct ReservationChanges {
    pub guest_name: Option<String>,
    pub room_type: Option<String>,
    pub checkin_date: Option<NaiveDate>,
    pub checkout_date: Option<NaiveDate>,
    pub booking_amount: Option<Decimal>,
    pub payment_status: Option<PaymentStatus>,
    pub fulfillment_status: Option<FulfillmentStatus>,
}

impl ReservationChanges {
    pub fn is_empty(&self) -> bool {
        self.guest_name.is_none()
            && self.room_type.is_none()
            && self.checkin_date.is_none()
            && self.checkout_date.is_none()
            && self.booking_amount.is_none()
            && self.payment_status.is_none()
            && self.fulfillment_status.is_none()
    }
}

// Catálogo de tipos de quarto exposto para pré-preencher o formulário.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeInfo {
    pub room_type: String,
    pub rate: Decimal,
    pub description: String,
}
