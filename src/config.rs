// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CustomerRepository, ReportRepository, ReservationRepository, StaffRepository,
        UserRepository,
    },
    services::{
        auth::AuthService, customer::CustomerService, document::DocumentService,
        report::ReportService, reservation::ReservationService, staff::StaffService,
    },
};

const MAX_CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub customer_service: CustomerService,
    pub staff_service: StaffService,
    pub reservation_service: ReservationService,
    pub report_service: ReportService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = database_url_from_env()?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let db_pool = connect_with_retry(&database_url).await?;

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let staff_repo = StaffRepository::new(db_pool.clone());
        let reservation_repo = ReservationRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            customer_repo.clone(),
            staff_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let customer_service = CustomerService::new(customer_repo.clone(), db_pool.clone());
        let staff_service = StaffService::new(staff_repo, user_repo, db_pool.clone());
        let reservation_service =
            ReservationService::new(reservation_repo, customer_repo, db_pool.clone());
        let report_service = ReportService::new(report_repo);
        let document_service = DocumentService::new(report_service.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            customer_service,
            staff_service,
            reservation_service,
            report_service,
            document_service,
        })
    }
}

// A configuração vem em cinco variáveis separadas (DB_HOST, DB_PORT,
// DB_USER, DB_PASSWORD, DB_NAME), herança da aplicação de balcão.
fn database_url_from_env() -> anyhow::Result<String> {
    let host = env::var("DB_HOST").map_err(|_| anyhow::anyhow!("DB_HOST deve ser definida"))?;
    let port = env::var("DB_PORT").map_err(|_| anyhow::anyhow!("DB_PORT deve ser definida"))?;
    let user = env::var("DB_USER").map_err(|_| anyhow::anyhow!("DB_USER deve ser definida"))?;
    let password =
        env::var("DB_PASSWORD").map_err(|_| anyhow::anyhow!("DB_PASSWORD deve ser definida"))?;
    let name = env::var("DB_NAME").map_err(|_| anyhow::anyhow!("DB_NAME deve ser definida"))?;

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, name
    ))
}

// Até 3 tentativas com espera fixa entre elas; depois disso o processo não
// deve subir.
async fn connect_with_retry(database_url: &str) -> anyhow::Result<PgPool> {
    for attempt in 1..=MAX_CONNECT_ATTEMPTS {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!(
                    "✅ Conexão com o banco de dados estabelecida (tentativa {})",
                    attempt
                );
                return Ok(pool);
            }
            Err(err) => {
                tracing::error!("❌ Tentativa de conexão {} falhou: {}", attempt, err);
                if attempt < MAX_CONNECT_ATTEMPTS {
                    tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                }
            }
        }
    }

    Err(anyhow::anyhow!(
        "Falha ao conectar após {} tentativas",
        MAX_CONNECT_ATTEMPTS
    ))
}
