use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A regra do contrato externo: nenhuma exceção crua do banco chega ao
// chamador; tudo vira uma variante daqui.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Data inválida: '{0}'")]
    InvalidDate(String),

    #[error("Valor monetário inválido: '{0}'")]
    InvalidAmount(String),

    #[error("A data de check-out deve ser posterior à de check-in")]
    StayRange,

    #[error("A data de check-in não pode estar no passado")]
    PastCheckin,

    #[error("Nenhum campo para atualizar")]
    EmptyUpdate,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("Reserva cancelada não pode ser modificada")]
    ReservationCancelled,

    #[error("Reserva já está cancelada")]
    AlreadyCancelled,

    #[error("Violação de chave única: {0}")]
    UniqueConstraintViolation(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Falha ao gerar relatório: {0}")]
    ReportExport(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de migração")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidDate(ref d) => {
                let body = Json(json!({ "error": format!("Data inválida: '{}'.", d) }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidAmount(ref v) => {
                let body = Json(json!({ "error": format!("Valor inválido: '{}'.", v) }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::StayRange => (
                StatusCode::BAD_REQUEST,
                "A data de check-out deve ser posterior à de check-in.",
            ),
            AppError::PastCheckin => (
                StatusCode::BAD_REQUEST,
                "A data de check-in não pode estar no passado.",
            ),
            AppError::EmptyUpdate => (StatusCode::BAD_REQUEST, "Nenhum campo para atualizar."),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Você não tem permissão para esta operação."),
            AppError::NotFound(what) => {
                let body = Json(json!({ "error": format!("{} não encontrado(a).", what) }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::ReservationCancelled => (
                StatusCode::CONFLICT,
                "Esta reserva foi cancelada e não pode mais ser modificada.",
            ),
            AppError::AlreadyCancelled => (StatusCode::CONFLICT, "A reserva já está cancelada."),
            AppError::UniqueConstraintViolation(ref c) => {
                let body = Json(json!({ "error": format!("Registro duplicado: {}.", c) }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            // Todos os outros (DatabaseError, InternalServerError, exportações)
            // viram 500. O `tracing` registra a mensagem detalhada do `thiserror`.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
