// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::{headers::UserAgent, TypedHeader};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginPayload, RegisterPayload, User},
};

// Handler de registro (fluxo público: sempre cria um cliente)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Cliente registrado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já registrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let agent = user_agent.as_ref().map(|TypedHeader(ua)| ua.as_str());
    let response = app_state
        .auth_service
        .register_customer(
            &payload.full_name,
            &payload.email,
            &payload.password,
            payload.gender,
            None,
            agent,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// Handler de login com verificação de papel
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let agent = user_agent.as_ref().map(|TypedHeader(ua)| ua.as_str());
    let response = app_state
        .auth_service
        .authenticate(&payload.email, &payload.password, payload.role, None, agent)
        .await?;

    Ok(Json(response))
}

// Registra o logout na trilha de auditoria (não há sessão no servidor)
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Logout registrado")),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    user_agent: Option<TypedHeader<UserAgent>>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let agent = user_agent.as_ref().map(|TypedHeader(ua)| ua.as_str());
    app_state.auth_service.logout(&user, None, agent).await;
    Ok(Json(json!({ "message": "Logout registrado." })))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Usuário autenticado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
