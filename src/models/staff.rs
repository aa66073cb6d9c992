// src/models/staff.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::auth::Gender;
use crate::models::customer::AccountStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub staff_id: String,
    pub user_id: Option<i32>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Criação de funcionário: cria o usuário (role=staff) e o registro de
// staff na mesma transação.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewStaffPayload {
    #[validate(length(min = 1, message = "O ID do funcionário é obrigatório."))]
    pub staff_id: String,
    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    pub full_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 8, message = "A senha deve ter no mínimo 8 caracteres."))]
    pub password: String,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub phone: String,
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,
    pub gender: Option<Gender>,
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffPayload {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<AccountStatus>,
    pub gender: Option<Gender>,
    // Troca de senha opcional; re-hash feito no serviço.
    pub password: Option<String>,
}

impl UpdateStaffPayload {
    pub fn staff_fields_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.status.is_none()
    }
}
