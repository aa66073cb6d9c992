// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, StaffRepository, UserRepository},
    models::auth::{AccountProfile, AuthAction, AuthResponse, Claims, Gender, Role, User},
    services::booking_rules,
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    customer_repo: CustomerRepository,
    staff_repo: StaffRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        customer_repo: CustomerRepository,
        staff_repo: StaffRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            customer_repo,
            staff_repo,
            jwt_secret,
            pool,
        }
    }

    // Garante a conta admin padrão na subida (admin@example.com / admin123,
    // herdada do sistema de balcão).
    pub async fn bootstrap_default_admin(&self) -> Result<(), AppError> {
        let hashed = tokio::task::spawn_blocking(|| hash("admin123", bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        self.user_repo.ensure_default_admin(&hashed).await
    }

    // Login com verificação de papel. Toda tentativa entra na trilha de
    // auditoria; nas falhas o user_id registrado é NULL.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: Role,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<AuthResponse, AppError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self
            .user_repo
            .find_active_by_email_and_role(&email, role)
            .await?
        else {
            self.user_repo
                .log_auth_action(None, &email, AuthAction::Fail, ip_address, user_agent)
                .await;
            tracing::warn!("Tentativa de login {:?} recusada para {}", role, email);
            return Err(AppError::InvalidCredentials);
        };

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            self.user_repo
                .log_auth_action(None, &email, AuthAction::Fail, ip_address, user_agent)
                .await;
            tracing::warn!("Senha incorreta para {}", email);
            return Err(AppError::InvalidCredentials);
        }

        // A partir daqui o par (e-mail, senha, papel) confere; o login entra
        // na auditoria antes da checagem de integridade do sub-registro,
        // na mesma ordem do sistema legado.
        self.user_repo
            .log_auth_action(
                Some(user.user_id),
                &email,
                AuthAction::Login,
                ip_address,
                user_agent,
            )
            .await;
        tracing::info!("Login {:?} bem-sucedido para {}", role, email);

        let mut profile = AccountProfile {
            user,
            staff: None,
            customer: None,
        };

        match role {
            Role::Staff => {
                // Usuário com papel de staff mas sem registro de staff é
                // inconsistência de integridade: o login é recusado.
                let Some(staff) = self.staff_repo.find_by_email(&email).await? else {
                    tracing::error!("Registro de staff ausente para {}", email);
                    return Err(AppError::InvalidCredentials);
                };
                profile.staff = Some(staff);
            }
            Role::Customer => {
                // O sub-registro de cliente enriquece o perfil quando existe,
                // mas a ausência dele não bloqueia o login.
                profile.customer = self.customer_repo.find_by_email(&email).await?;
            }
            Role::Admin => {}
        }

        let token = self.create_token(&profile.user)?;
        Ok(AuthResponse {
            token,
            account: profile,
        })
    }

    // Registro público: cria o usuário (sempre customer) e o registro de
    // cliente vinculado na MESMA transação.
    pub async fn register_customer(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        gender: Gender,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<AuthResponse, AppError> {
        let email = email.trim().to_lowercase();

        // Checagem amigável de duplicidade; o índice único continua sendo a
        // barreira final.
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                full_name,
                &email,
                &hashed_password,
                gender,
                Role::Customer,
            )
            .await?;

        // CUSTxxxx derivado do user_id recém-criado (já atômico).
        let customer_id = booking_rules::format_customer_id(i64::from(user.user_id));
        let customer = self
            .customer_repo
            .insert_customer(
                &mut *tx,
                &customer_id,
                Some(user.user_id),
                full_name,
                &email,
                "Not specified",
                "Not specified",
                crate::models::customer::AccountStatus::Active,
            )
            .await?;

        tx.commit().await?;

        self.user_repo
            .log_auth_action(
                Some(user.user_id),
                &email,
                AuthAction::Register,
                ip_address,
                user_agent,
            )
            .await;
        tracing::info!("Novo cliente registrado: {} ({})", email, customer_id);

        let token = self.create_token(&user)?;
        Ok(AuthResponse {
            token,
            account: AccountProfile {
                user,
                staff: None,
                customer: Some(customer),
            },
        })
    }

    pub async fn logout(
        &self,
        user: &User,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) {
        self.user_repo
            .log_auth_action(
                Some(user.user_id),
                &user.email,
                AuthAction::Logout,
                ip_address,
                user_agent,
            )
            .await;
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::NotFound("Usuário"))
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user.user_id,
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
