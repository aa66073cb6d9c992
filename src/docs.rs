// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::search_customers,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Staff ---
        handlers::staff::list_staff,
        handlers::staff::search_staff,
        handlers::staff::create_staff,
        handlers::staff::update_staff,
        handlers::staff::delete_staff,

        // --- Reservations ---
        handlers::reservations::list_reservations,
        handlers::reservations::my_reservations,
        handlers::reservations::next_reservation_id,
        handlers::reservations::room_types,
        handlers::reservations::get_reservation,
        handlers::reservations::create_reservation,
        handlers::reservations::update_reservation,
        handlers::reservations::cancel_reservation,
        handlers::reservations::delete_reservation,

        // --- Dashboard ---
        handlers::dashboard::overview,
        handlers::dashboard::my_overview,

        // --- Reports ---
        handlers::reports::customer_growth,
        handlers::reports::booking_trends,
        handlers::reports::revenue_trends,
        handlers::reports::occupancy_trends,
        handlers::reports::recent_customers,
        handlers::reports::full_report,
        handlers::reports::export_csv,
        handlers::reports::export_pdf,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Gender,
            models::auth::AuthAction,
            models::auth::User,
            models::auth::AccountProfile,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Customers ---
            models::customer::AccountStatus,
            models::customer::Customer,
            models::customer::NewCustomerPayload,
            models::customer::UpdateCustomerPayload,

            // --- Staff ---
            models::staff::Staff,
            models::staff::NewStaffPayload,
            models::staff::UpdateStaffPayload,

            // --- Reservations ---
            models::reservation::PaymentStatus,
            models::reservation::FulfillmentStatus,
            models::reservation::Reservation,
            models::reservation::ReservationListRow,
            models::reservation::NewReservationPayload,
            models::reservation::UpdateReservationPayload,
            models::reservation::RoomTypeInfo,

            // --- Reports ---
            models::report::MonthlyCount,
            models::report::MonthlyAmount,
            models::report::MonthlyRate,
            models::report::RecentCustomer,
            models::report::DashboardOverview,
            models::report::CustomerOverview,
            models::report::ReportData,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, registro e auditoria"),
        (name = "Customers", description = "Gestão de clientes"),
        (name = "Staff", description = "Gestão de funcionários (admin)"),
        (name = "Reservations", description = "Ciclo de vida das reservas"),
        (name = "Dashboard", description = "Indicadores dos painéis"),
        (name = "Reports", description = "Séries mensais e exportações")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
