// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

// Resumo exibido no painel inicial. activeAlerts é contado ao vivo;
// os demais são os valores fixos de apresentação do portal (não existe
// ingestão de medição neste sistema).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_generation: String,
    pub active_alerts: i64,
    pub efficiency: String,
    pub savings: String,
}
