// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Alerts ---
        handlers::alerts::list_alerts,
        handlers::alerts::resolve_alert,

        // --- Billing ---
        handlers::billing::list_billing_reports,
        handlers::billing::set_unit_nickname,

        // --- Clients ---
        handlers::clients::list_clients,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Reports ---
        handlers::reports::list_reports,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UserStatus,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Alerts ---
            models::alert::AlertSeverity,
            models::alert::AlertStatus,
            models::alert::Alert,

            // --- Billing ---
            models::billing::BillingReport,
            models::billing::BillingUnit,
            models::billing::BillingHistory,
            models::billing::UnitNickname,
            models::billing::EnrichedBillingUnit,
            models::billing::EnrichedBillingReport,
            models::billing::SetNicknamePayload,

            // --- Reports ---
            models::report::Report,

            // --- Dashboard ---
            models::dashboard::DashboardStats,

            // --- CLIENTS PAYLOADS ---
            handlers::clients::CreateClientPayload,
            handlers::clients::UpdateClientPayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registro, login e sessão"),
        (name = "Alerts", description = "Alertas das usinas"),
        (name = "Billing", description = "Faturas, UCs e apelidos"),
        (name = "Clients", description = "Gestão de clientes (admin)"),
        (name = "Reports", description = "Relatórios documentais"),
        (name = "Dashboard", description = "Resumo do painel"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
