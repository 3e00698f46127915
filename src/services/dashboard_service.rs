// src/services/dashboard_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{auth::Role, dashboard::DashboardStats},
    services::alert_service::AlertService,
};

#[derive(Clone)]
pub struct DashboardService {
    alert_service: AlertService,
}

impl DashboardService {
    pub fn new(alert_service: AlertService) -> Self {
        Self { alert_service }
    }

    // Só a contagem de alertas é viva; geração/eficiência/economia são os
    // valores de apresentação do portal (não há ingestão de medição).
    pub async fn get_stats(
        &self,
        role: Role,
        requester_id: Uuid,
    ) -> Result<DashboardStats, AppError> {
        let active_alerts = self.alert_service.count_active(role, requester_id).await?;

        Ok(DashboardStats {
            total_generation: "1,234 kWh".to_string(),
            active_alerts,
            efficiency: "98%".to_string(),
            savings: "R$ 450,00".to_string(),
        })
    }
}
