// src/handlers/staff.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::customers::{parse_status_filter, SearchQuery, StatusFilter},
    models::staff::{NewStaffPayload, Staff, UpdateStaffPayload},
};

#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    params(StatusFilter),
    responses((status = 200, description = "Lista de funcionários", body = Vec<Staff>)),
    security(("api_jwt" = []))
)]
pub async fn list_staff(
    State(app_state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<Vec<Staff>>, AppError> {
    let status = parse_status_filter(filter.status.as_deref());
    let staff = app_state.staff_service.list(status).await?;
    Ok(Json(staff))
}

#[utoipa::path(
    get,
    path = "/api/staff/search",
    tag = "Staff",
    params(SearchQuery),
    responses((status = 200, description = "Funcionários encontrados", body = Vec<Staff>)),
    security(("api_jwt" = []))
)]
pub async fn search_staff(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Staff>>, AppError> {
    let staff = app_state.staff_service.search(&query.q).await?;
    Ok(Json(staff))
}

#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    request_body = NewStaffPayload,
    responses(
        (status = 201, description = "Funcionário criado", body = Staff),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail ou ID já registrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_staff(
    State(app_state): State<AppState>,
    Json(payload): Json<NewStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let staff = app_state.staff_service.add(&payload).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

#[utoipa::path(
    put,
    path = "/api/staff/{staff_id}",
    tag = "Staff",
    request_body = UpdateStaffPayload,
    params(("staff_id" = String, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário atualizado"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_staff(
    State(app_state): State<AppState>,
    Path(staff_id): Path<String>,
    Json(payload): Json<UpdateStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.staff_service.update(&staff_id, &payload).await?;
    Ok(Json(json!({ "message": "Funcionário atualizado." })))
}

// A remoção apaga também o usuário vinculado (cascata).
#[utoipa::path(
    delete,
    path = "/api/staff/{staff_id}",
    tag = "Staff",
    params(("staff_id" = String, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário removido"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_staff(
    State(app_state): State<AppState>,
    Path(staff_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.staff_service.delete(&staff_id).await?;
    Ok(Json(json!({ "message": "Funcionário removido." })))
}
