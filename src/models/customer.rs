// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Status compartilhado entre clientes e funcionários (tipo `account_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_status")]
pub enum AccountStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: String,
    pub user_id: Option<i32>,
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Cadastro manual feito pela recepção (o ID é gerado pelo servidor).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomerPayload {
    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    pub full_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub phone: String,
    pub status: Option<AccountStatus>,
}

// Atualização parcial: apenas os campos presentes são persistidos.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub status: Option<AccountStatus>,
}

impl UpdateCustomerPayload {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.status.is_none()
    }
}
