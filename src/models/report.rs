// src/models/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Relatório documental (PDF de desempenho, laudo, etc.).
// Não confundir com BillingReport, que é a fatura mensal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub report_type: String,
    pub url: String,
    pub user_id: Option<Uuid>,
}
