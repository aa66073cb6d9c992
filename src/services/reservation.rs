// src/services/reservation.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, ReservationRepository},
    models::{
        auth::User,
        reservation::{
            FulfillmentStatus, NewReservationPayload, PaymentStatus, Reservation,
            ReservationChanges, ReservationListRow, RoomTypeInfo, UpdateReservationPayload,
        },
    },
    services::booking_rules::{self, BookingOrigin},
};

#[derive(Clone)]
pub struct ReservationService {
    repo: ReservationRepository,
    customer_repo: CustomerRepository,
    pool: PgPool,
}

impl ReservationService {
    pub fn new(repo: ReservationRepository, customer_repo: CustomerRepository, pool: PgPool) -> Self {
        Self {
            repo,
            customer_repo,
            pool,
        }
    }

    pub async fn list(
        &self,
        status: Option<FulfillmentStatus>,
    ) -> Result<Vec<ReservationListRow>, AppError> {
        self.repo.get_reservations(status).await
    }

    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<Reservation>, AppError> {
        self.repo.get_by_user(user_id).await
    }

    pub async fn get(&self, reservation_id: &str) -> Result<Reservation, AppError> {
        self.repo
            .find_by_id(reservation_id)
            .await?
            .ok_or(AppError::NotFound("Reserva"))
    }

    // Gera o próximo RESxxxxx pela sequência. Mantém a verificação de
    // colisão e o plano B por timestamp do fluxo legado.
    pub async fn generate_reservation_id(&self) -> String {
        match self.repo.next_sequence_value(&self.pool).await {
            Ok(seq) => {
                let candidate = booking_rules::format_reservation_id(seq);
                match self.repo.id_exists(&self.pool, &candidate).await {
                    Ok(false) => candidate,
                    Ok(true) => {
                        tracing::error!("Colisão de ID de reserva em {}", candidate);
                        booking_rules::fallback_reservation_id(Utc::now().timestamp())
                    }
                    Err(err) => {
                        tracing::error!("Falha ao verificar ID de reserva: {}", err);
                        booking_rules::fallback_reservation_id(Utc::now().timestamp())
                    }
                }
            }
            Err(err) => {
                tracing::error!("Falha ao gerar ID de reserva: {}", err);
                booking_rules::fallback_reservation_id(Utc::now().timestamp())
            }
        }
    }

    // Criação de reserva. `origin` carrega a assimetria herdada: o portal do
    // cliente bloqueia check-in no passado e exige valor positivo; o balcão
    // não faz nenhuma das duas checagens.
    pub async fn create(
        &self,
        user: &User,
        payload: &NewReservationPayload,
        origin: BookingOrigin,
    ) -> Result<Reservation, AppError> {
        let checkin = booking_rules::parse_booking_date(&payload.checkin)?;
        let checkout = booking_rules::parse_booking_date(&payload.checkout)?;
        let amount = booking_rules::parse_amount(&payload.amount)?;

        let today = Utc::now().date_naive();
        booking_rules::validate_stay(origin, checkin, checkout, today)?;
        booking_rules::validate_amount(origin, amount)?;

        let reservation_id = self.generate_reservation_id().await;

        let mut tx = self.pool.begin().await?;

        // Resolve o customer_id a partir do usuário quando não informado.
        let customer_id = match &payload.customer_id {
            Some(id) => Some(id.clone()),
            None => self
                .customer_repo
                .find_by_user_id(&mut *tx, user.user_id)
                .await?
                .map(|c| c.customer_id),
        };

        let guest_name = payload
            .guest_name
            .clone()
            .unwrap_or_else(|| user.full_name.clone());

        let reservation = self
            .repo
            .insert_reservation(
                &mut *tx,
                &reservation_id,
                user.user_id,
                customer_id.as_deref(),
                &guest_name,
                &payload.room_type,
                checkin,
                checkout,
                amount,
                payload.payment_status.unwrap_or(PaymentStatus::Pending),
                payload.fulfillment_status.unwrap_or(FulfillmentStatus::Pending),
            )
            .await?;

        tx.commit().await?;
        tracing::info!("Reserva {} criada para o usuário {}", reservation_id, user.user_id);
        Ok(reservation)
    }

    // Edição parcial. Reserva cancelada é intocável; as datas mescladas
    // (novas ou existentes) precisam continuar válidas.
    pub async fn update(
        &self,
        reservation_id: &str,
        payload: &UpdateReservationPayload,
    ) -> Result<(), AppError> {
        let current = self
            .repo
            .find_by_id(reservation_id)
            .await?
            .ok_or(AppError::NotFound("Reserva"))?;

        if !booking_rules::can_edit(current.fulfillment_status) {
            return Err(AppError::ReservationCancelled);
        }

        if payload.is_empty() {
            return Err(AppError::EmptyUpdate);
        }

        let mut changes = ReservationChanges {
            guest_name: payload.guest_name.clone(),
            room_type: payload.room_type.clone(),
            payment_status: payload.payment_status,
            fulfillment_status: payload.fulfillment_status,
            ..Default::default()
        };

        if let Some(raw) = &payload.checkin {
            changes.checkin_date = Some(booking_rules::parse_booking_date(raw)?);
        }
        if let Some(raw) = &payload.checkout {
            changes.checkout_date = Some(booking_rules::parse_booking_date(raw)?);
        }
        if let Some(raw) = &payload.amount {
            changes.booking_amount = Some(booking_rules::parse_amount(raw)?);
        }

        // O par final de datas precisa respeitar o invariante, mesmo quando
        // só um dos lados mudou.
        let merged_checkin = changes.checkin_date.unwrap_or(current.checkin_date);
        let merged_checkout = changes.checkout_date.unwrap_or(current.checkout_date);
        if merged_checkout <= merged_checkin {
            return Err(AppError::StayRange);
        }

        let updated = self.repo.update_reservation(reservation_id, &changes).await?;
        if !updated {
            return Err(AppError::NotFound("Reserva"));
        }
        Ok(())
    }

    // Cancelamento: transição de mão única nos dois eixos de status.
    // Re-cancelar é recusado sem nenhuma mutação.
    pub async fn cancel(&self, reservation_id: &str) -> Result<(), AppError> {
        let current = self
            .repo
            .find_by_id(reservation_id)
            .await?
            .ok_or(AppError::NotFound("Reserva"))?;

        if current.fulfillment_status == FulfillmentStatus::Cancelled {
            return Err(AppError::AlreadyCancelled);
        }

        let cancelled = self.repo.cancel_reservation(reservation_id).await?;
        if !cancelled {
            return Err(AppError::NotFound("Reserva"));
        }
        tracing::info!("Reserva {} marcada como cancelada", reservation_id);
        Ok(())
    }

    // Remoção física, restrita ao caminho administrativo.
    pub async fn delete(&self, reservation_id: &str) -> Result<(), AppError> {
        let deleted = self.repo.delete_reservation(reservation_id).await?;
        if !deleted {
            return Err(AppError::NotFound("Reserva"));
        }
        tracing::warn!("Reserva {} removida fisicamente", reservation_id);
        Ok(())
    }

    // Catálogo de tipos de quarto: os já usados no banco, com a diária da
    // tabela estática; catálogo padrão quando ainda não há reservas.
    pub async fn room_types(&self) -> Vec<RoomTypeInfo> {
        match self.repo.distinct_room_types().await {
            Ok(types) if !types.is_empty() => types
                .into_iter()
                .map(|room_type| {
                    let rate = booking_rules::suggested_rate(&room_type);
                    RoomTypeInfo {
                        room_type,
                        rate,
                        description: String::new(),
                    }
                })
                .collect(),
            Ok(_) => booking_rules::fallback_room_catalog(),
            Err(err) => {
                tracing::error!("Falha ao listar tipos de quarto: {}", err);
                booking_rules::fallback_room_catalog()
            }
        }
    }
}
