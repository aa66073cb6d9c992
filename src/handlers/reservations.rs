// src/handlers/reservations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{require_admin, require_staff, AuthenticatedUser},
    models::{
        auth::Role,
        reservation::{
            FulfillmentStatus, NewReservationPayload, Reservation, ReservationListRow,
            RoomTypeInfo, UpdateReservationPayload,
        },
    },
    services::booking_rules::BookingOrigin,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservationFilter {
    // "all" (padrão), "confirmed", "pending" ou "cancelled"
    pub status: Option<String>,
}

fn parse_reservation_filter(raw: Option<&str>) -> Option<FulfillmentStatus> {
    match raw.map(|s| s.to_lowercase()) {
        Some(ref s) if s == "confirmed" => Some(FulfillmentStatus::Confirmed),
        Some(ref s) if s == "pending" => Some(FulfillmentStatus::Pending),
        Some(ref s) if s == "cancelled" => Some(FulfillmentStatus::Cancelled),
        _ => None,
    }
}

#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "Reservations",
    params(ReservationFilter),
    responses((status = 200, description = "Lista de reservas", body = Vec<ReservationListRow>)),
    security(("api_jwt" = []))
)]
pub async fn list_reservations(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<ReservationFilter>,
) -> Result<Json<Vec<ReservationListRow>>, AppError> {
    require_staff(&user)?;
    let status = parse_reservation_filter(filter.status.as_deref());
    let rows = app_state.reservation_service.list(status).await?;
    Ok(Json(rows))
}

// As reservas do próprio usuário autenticado.
#[utoipa::path(
    get,
    path = "/api/reservations/mine",
    tag = "Reservations",
    responses((status = 200, description = "Reservas do usuário", body = Vec<Reservation>)),
    security(("api_jwt" = []))
)]
pub async fn my_reservations(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let rows = app_state
        .reservation_service
        .list_by_user(user.user_id)
        .await?;
    Ok(Json(rows))
}

// Pré-preenche o campo de ID do formulário, tanto no portal quanto na
// recepção, como as telas antigas faziam.
#[utoipa::path(
    get,
    path = "/api/reservations/next-id",
    tag = "Reservations",
    responses((status = 200, description = "Próximo ID disponível")),
    security(("api_jwt" = []))
)]
pub async fn next_reservation_id(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let reservation_id = app_state.reservation_service.generate_reservation_id().await;
    Ok(Json(json!({ "reservationId": reservation_id })))
}

#[utoipa::path(
    get,
    path = "/api/reservations/room-types",
    tag = "Reservations",
    responses((status = 200, description = "Catálogo de tipos de quarto", body = Vec<RoomTypeInfo>)),
    security(("api_jwt" = []))
)]
pub async fn room_types(State(app_state): State<AppState>) -> Json<Vec<RoomTypeInfo>> {
    Json(app_state.reservation_service.room_types().await)
}

#[utoipa::path(
    get,
    path = "/api/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = String, Path, description = "ID da reserva (RESxxxxx)")),
    responses(
        (status = 200, description = "Reserva", body = Reservation),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(reservation_id): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    require_staff(&user)?;
    let reservation = app_state.reservation_service.get(&reservation_id).await?;
    Ok(Json(reservation))
}

// Criação. O papel do chamador define a origem: cliente passa pelas regras
// do portal (sem check-in no passado, valor positivo); staff/admin pelo
// balcão, que não aplica nenhuma das duas.
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = NewReservationPayload,
    responses(
        (status = 201, description = "Reserva criada", body = Reservation),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<NewReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let origin = match user.role {
        Role::Customer => BookingOrigin::CustomerPortal,
        Role::Staff | Role::Admin => BookingOrigin::FrontDesk,
    };

    let reservation = app_state
        .reservation_service
        .create(&user, &payload, origin)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

#[utoipa::path(
    put,
    path = "/api/reservations/{reservation_id}",
    tag = "Reservations",
    request_body = UpdateReservationPayload,
    params(("reservation_id" = String, Path, description = "ID da reserva (RESxxxxx)")),
    responses(
        (status = 200, description = "Reserva atualizada"),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Reserva cancelada não pode ser modificada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(reservation_id): Path<String>,
    Json(payload): Json<UpdateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    require_staff(&user)?;
    app_state
        .reservation_service
        .update(&reservation_id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Reserva atualizada." })))
}

// Cancelamento lógico (o registro permanece, com os dois status Cancelled).
#[utoipa::path(
    post,
    path = "/api/reservations/{reservation_id}/cancel",
    tag = "Reservations",
    params(("reservation_id" = String, Path, description = "ID da reserva (RESxxxxx)")),
    responses(
        (status = 200, description = "Reserva cancelada"),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Reserva já cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_staff(&user)?;
    app_state.reservation_service.cancel(&reservation_id).await?;
    Ok(Json(json!({ "message": "Reserva marcada como cancelada." })))
}

// Remoção física, só para o administrador.
#[utoipa::path(
    delete,
    path = "/api/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = String, Path, description = "ID da reserva (RESxxxxx)")),
    responses(
        (status = 200, description = "Reserva removida"),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&user)?;
    app_state.reservation_service.delete(&reservation_id).await?;
    Ok(Json(json!({ "message": "Reserva removida." })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtro_de_reservas_cobre_os_tres_status() {
        assert_eq!(
            parse_reservation_filter(Some("confirmed")),
            Some(FulfillmentStatus::Confirmed)
        );
        assert_eq!(
            parse_reservation_filter(Some("Pending")),
            Some(FulfillmentStatus::Pending)
        );
        assert_eq!(
            parse_reservation_filter(Some("cancelled")),
            Some(FulfillmentStatus::Cancelled)
        );
        assert_eq!(parse_reservation_filter(Some("all")), None);
        assert_eq!(parse_reservation_filter(None), None);
    }
}
