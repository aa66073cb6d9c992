// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{customer::Customer, staff::Staff};

// Papel do usuário, espelha o tipo `user_role` do banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    Male,
    Female,
    Other,
}

// Ações registradas na trilha de auditoria (append-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "auth_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Register,
    Login,
    Logout,
    Fail,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i32,
    pub full_name: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub gender: Gender,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Registro "enriquecido" devolvido pelo login: o usuário mais o
// sub-registro do papel dele, quando houver.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<Staff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

// Dados para registro de um novo usuário (fluxo público = sempre cliente)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    pub full_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 8, message = "A senha deve ter no mínimo 8 caracteres."))]
    pub password: String,
    pub gender: Gender,
}

// Dados para login (papel declarado, verificado contra o banco)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
    pub role: Role,
}

// Resposta de autenticação com o token e o perfil enriquecido
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub account: AccountProfile,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,   // ID do usuário
    pub role: Role, // Papel no momento do login
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn payload(full_name: &str, email: &str, password: &str) -> RegisterPayload {
        RegisterPayload {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
            gender: Gender::Other,
        }
    }

    #[test]
    fn registro_valido_passa() {
        assert!(payload("Maria Silva", "maria@example.com", "segredo123").validate().is_ok());
    }

    #[test]
    fn registro_exige_email_com_formato_basico() {
        assert!(payload("Maria", "sem-arroba", "segredo123").validate().is_err());
        assert!(payload("Maria", "", "segredo123").validate().is_err());
    }

    #[test]
    fn registro_exige_senha_de_8_caracteres() {
        assert!(payload("Maria", "maria@example.com", "curta").validate().is_err());
        assert!(payload("Maria", "maria@example.com", "12345678").validate().is_ok());
    }

    #[test]
    fn registro_exige_nome() {
        assert!(payload("", "maria@example.com", "segredo123").validate().is_err());
    }
}
