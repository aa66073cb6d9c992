//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{admin_guard, auth_guard, staff_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é adequado aqui: sem configuração e sem banco (após as 3
    // tentativas de conexão) a aplicação não deve subir.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Admin padrão herdado do sistema de balcão (credencial fixa de
    // fábrica, avisada no log quando criada).
    app_state
        .auth_service
        .bootstrap_default_admin()
        .await
        .expect("Falha ao garantir o admin padrão.");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    // Rotas de conta (qualquer usuário autenticado)
    let account_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_me))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/dashboard/me", get(handlers::dashboard::my_overview))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Reservas atendem portal e recepção no mesmo prefixo; a checagem de
    // papel fica nos handlers que são só da recepção.
    let reservation_routes = Router::new()
        .route(
            "/api/reservations",
            get(handlers::reservations::list_reservations)
                .post(handlers::reservations::create_reservation),
        )
        .route(
            "/api/reservations/mine",
            get(handlers::reservations::my_reservations),
        )
        .route(
            "/api/reservations/next-id",
            get(handlers::reservations::next_reservation_id),
        )
        .route(
            "/api/reservations/room-types",
            get(handlers::reservations::room_types),
        )
        .route(
            "/api/reservations/{reservation_id}",
            get(handlers::reservations::get_reservation)
                .put(handlers::reservations::update_reservation)
                .delete(handlers::reservations::delete_reservation),
        )
        .route(
            "/api/reservations/{reservation_id}/cancel",
            post(handlers::reservations::cancel_reservation),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Gestão de clientes: staff e admin
    let customer_routes = Router::new()
        .route(
            "/api/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/api/customers/search",
            get(handlers::customers::search_customers),
        )
        .route(
            "/api/customers/{customer_id}",
            put(handlers::customers::update_customer).delete(handlers::customers::delete_customer),
        )
        .layer(axum_middleware::from_fn(staff_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Gestão de funcionários: só o admin
    let staff_routes = Router::new()
        .route(
            "/api/staff",
            get(handlers::staff::list_staff).post(handlers::staff::create_staff),
        )
        .route("/api/staff/search", get(handlers::staff::search_staff))
        .route(
            "/api/staff/{staff_id}",
            put(handlers::staff::update_staff).delete(handlers::staff::delete_staff),
        )
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Painéis e relatórios: staff e admin
    let report_routes = Router::new()
        .route("/api/dashboard/overview", get(handlers::dashboard::overview))
        .route(
            "/api/reports/customer-growth",
            get(handlers::reports::customer_growth),
        )
        .route(
            "/api/reports/booking-trends",
            get(handlers::reports::booking_trends),
        )
        .route(
            "/api/reports/revenue-trends",
            get(handlers::reports::revenue_trends),
        )
        .route("/api/reports/occupancy", get(handlers::reports::occupancy_trends))
        .route(
            "/api/reports/recent-customers",
            get(handlers::reports::recent_customers),
        )
        .route("/api/reports/full", get(handlers::reports::full_report))
        .route("/api/reports/export/csv", get(handlers::reports::export_csv))
        .route("/api/reports/export/pdf", get(handlers::reports::export_pdf))
        .layer(axum_middleware::from_fn(staff_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(auth_routes)
        .merge(account_routes)
        .merge(reservation_routes)
        .merge(customer_routes)
        .merge(staff_routes)
        .merge(report_routes)
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
