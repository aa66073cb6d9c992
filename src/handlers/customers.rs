// src/handlers/customers.rs

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
    models::customer::{AccountStatus, Customer, NewCustomerPayload, UpdateCustomerPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatusFilter {
    // "all" (padrão), "active" ou "inactive"
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub q: String,
}

// Converte o filtro textual da tela em status opcional.
pub fn parse_status_filter(raw: Option<&str>) -> Option<AccountStatus> {
    match raw.map(|s| s.to_lowercase()) {
        Some(ref s) if s == "active" => Some(AccountStatus::Active),
        Some(ref s) if s == "inactive" => Some(AccountStatus::Inactive),
        _ => None,
    }
}

#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(StatusFilter),
    responses((status = 200, description = "Lista de clientes", body = Vec<Customer>)),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let status = parse_status_filter(filter.status.as_deref());
    let customers = app_state.customer_service.list(status).await?;
    Ok(Json(customers))
}

#[utoipa::path(
    get,
    path = "/api/customers/search",
    tag = "Customers",
    params(SearchQuery),
    responses((status = 200, description = "Clientes encontrados", body = Vec<Customer>)),
    security(("api_jwt" = []))
)]
pub async fn search_customers(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = app_state.customer_service.search(&query.q).await?;
    Ok(Json(customers))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = NewCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<NewCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let customer = app_state.customer_service.add(&payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

#[utoipa::path(
    put,
    path = "/api/customers/{customer_id}",
    tag = "Customers",
    request_body = UpdateCustomerPayload,
    params(("customer_id" = String, Path, description = "ID do cliente (CUSTxxxx)")),
    responses(
        (status = 200, description = "Cliente atualizado"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .customer_service
        .update(&customer_id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Cliente atualizado." })))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{customer_id}",
    tag = "Customers",
    params(("customer_id" = String, Path, description = "ID do cliente (CUSTxxxx)")),
    responses(
        (status = 200, description = "Cliente removido"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.customer_service.delete(&customer_id).await?;
    Ok(Json(json!({ "message": "Cliente removido." })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtro_de_status_aceita_all_e_ignora_caixa() {
        assert_eq!(parse_status_filter(Some("active")), Some(AccountStatus::Active));
        assert_eq!(parse_status_filter(Some("Inactive")), Some(AccountStatus::Inactive));
        assert_eq!(parse_status_filter(Some("all")), None);
        assert_eq!(parse_status_filter(Some("qualquer")), None);
        assert_eq!(parse_status_filter(None), None);
    }
}
