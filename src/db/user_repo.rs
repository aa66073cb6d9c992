// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::auth::{AuthAction, Gender, Role, User},
};

const USER_COLUMNS: &str =
    "user_id, full_name, email, password_hash, gender, role, is_active, created_at, updated_at";

// O repositório de usuários, responsável pelas tabelas 'users' e 'auth_logs'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca com papel e atividade: é o predicado exato do login.
    // A comparação de e-mail é sensível a maiúsculas, como no esquema legado.
    pub async fn find_active_by_email_and_role(
        &self,
        email: &str,
        role: Role,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE email = $1 AND role = $2 AND is_active = TRUE"
        ))
        .bind(email)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário. Recebe um executor para poder participar da
    // transação de registro (usuário + cliente na mesma unidade).
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        full_name: &str,
        email: &str,
        password_hash: &str,
        gender: Gender,
        role: Role,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (full_name, email, password_hash, gender, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(gender)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        user_id: i32,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE user_id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Trilha de auditoria append-only. Falha aqui nunca derruba o fluxo de
    // autenticação: registra no log e segue.
    pub async fn log_auth_action(
        &self,
        user_id: Option<i32>,
        email: &str,
        action: AuthAction,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) {
        let result = sqlx::query(
            "INSERT INTO auth_logs (user_id, email, action, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user_id)
        .bind(email)
        .bind(action)
        .bind(ip_address)
        .bind(user_agent)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            tracing::error!("Falha ao registrar auditoria de '{}': {}", email, err);
        }
    }

    // Garante o admin padrão na primeira subida. Credencial fixa herdada do
    // sistema legado; o aviso fica no log enquanto ela existir.
    pub async fn ensure_default_admin(&self, password_hash: &str) -> Result<(), AppError> {
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE email = 'admin@example.com'",
        )
        .fetch_one(&self.pool)
        .await?;

        if existing == 0 {
            sqlx::query(
                "INSERT INTO users (full_name, email, password_hash, gender, role) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind("Admin User")
            .bind("admin@example.com")
            .bind(password_hash)
            .bind(Gender::Male)
            .bind(Role::Admin)
            .execute(&self.pool)
            .await?;
            tracing::warn!(
                "⚠️ Conta admin@example.com criada com a senha padrão de fábrica; troque-a em produção."
            );
        }

        Ok(())
    }
}
