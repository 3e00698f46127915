// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{AlertRepository, BillingRepository, ReportRepository, UserRepository},
    services::{
        alert_service::AlertService, auth::AuthService, billing_service::BillingService,
        client_service::ClientService, dashboard_service::DashboardService,
        report_service::ReportService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,

    // Repositórios expostos para o seed e importadores
    pub user_repo: UserRepository,
    pub alert_repo: AlertRepository,
    pub billing_repo: BillingRepository,

    // Serviços com as regras de negócio
    pub auth_service: AuthService,
    pub alert_service: AlertService,
    pub billing_service: BillingService,
    pub report_service: ReportService,
    pub client_service: ClientService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let alert_repo = AlertRepository::new(db_pool.clone());
        let billing_repo = BillingRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let alert_service = AlertService::new(Arc::new(alert_repo.clone()));
        let billing_service = BillingService::new(Arc::new(billing_repo.clone()));
        let report_service = ReportService::new(report_repo);
        let client_service = ClientService::new(user_repo.clone());
        let dashboard_service = DashboardService::new(alert_service.clone());

        Ok(Self {
            db_pool,
            user_repo,
            alert_repo,
            billing_repo,
            auth_service,
            alert_service,
            billing_service,
            report_service,
            client_service,
            dashboard_service,
        })
    }
}
