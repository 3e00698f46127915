// src/models/billing.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Uma fatura consolidada por usuário por mês de referência.
// Criada por um processo externo de importação; somente leitura aqui.
// Os valores de energia ficam como TEXT no banco (vêm assim da importação).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mes: i32,
    pub ano: i32,
    pub energia_injetada: String,
    pub energia_consumida: String,
    pub saldo_credito: String,
    pub month_year: String,
    pub pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Unidade consumidora (UC) de uma fatura.
// codigo_cliente é o código físico da UC, estável entre meses; é a chave
// de correlação com os apelidos — nunca o id da linha.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingUnit {
    pub id: Uuid,
    pub billing_report_id: Uuid,
    pub codigo_cliente: String,
    pub creditos_recebidos: String,
    pub consumo_mes: String,
    pub saldo_acumulado: String,
    pub eh_geradora: bool,
}

// Linha do histórico de 13 meses da fatura (nível fatura, não por UC)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingHistory {
    pub id: Uuid,
    pub billing_report_id: Uuid,
    pub mes: i32,
    pub ano: i32,
    pub energia_consumida: String,
    pub energia_injetada: String,
    pub kwh_compensado: String,
    pub credito_gerado: String,
}

// Apelido de UC escolhido pelo usuário, chaveado por (user_id, unit_code).
// Persiste entre meses porque a chave é o código da UC, não o id da linha
// de fatura.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitNickname {
    pub id: Uuid,
    pub user_id: Uuid,
    pub unit_code: String,
    pub nickname: String,
}

// --- SAÍDA ENRIQUECIDA ---

// UC com o apelido anexado (ausente do JSON quando não há apelido)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedBillingUnit {
    pub id: Uuid,
    pub billing_report_id: Uuid,
    pub codigo_cliente: String,
    pub creditos_recebidos: String,
    pub consumo_mes: String,
    pub saldo_acumulado: String,
    pub eh_geradora: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

// Fatura com UCs e histórico anexados. energia_consumida e month_year
// saem recalculados (o valor gravado é considerado obsoleto quando a
// fatura tem UCs).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedBillingReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mes: i32,
    pub ano: i32,
    pub energia_injetada: String,
    pub energia_consumida: String,
    pub saldo_credito: String,
    pub month_year: String,
    pub pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,

    pub units: Vec<EnrichedBillingUnit>,
    pub history: Vec<BillingHistory>,
}

// Dados para o upsert de apelido
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetNicknamePayload {
    // Só tem efeito para admin: apelida a UC de outro usuário
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O código da UC é obrigatório."))]
    pub unit_code: String,

    #[validate(length(min = 1, message = "O apelido é obrigatório."))]
    pub nickname: String,
}

// Dados de inserção usados pelo seed/importação
#[derive(Debug, Clone)]
pub struct NewBillingReport {
    pub user_id: Uuid,
    pub mes: i32,
    pub ano: i32,
    pub energia_injetada: String,
    pub energia_consumida: String,
    pub saldo_credito: String,
    pub month_year: String,
    pub pdf_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBillingUnit {
    pub billing_report_id: Uuid,
    pub codigo_cliente: String,
    pub creditos_recebidos: String,
    pub consumo_mes: String,
    pub saldo_acumulado: String,
    pub eh_geradora: bool,
}

#[derive(Debug, Clone)]
pub struct NewBillingHistory {
    pub billing_report_id: Uuid,
    pub mes: i32,
    pub ano: i32,
    pub energia_consumida: String,
    pub energia_injetada: String,
    pub kwh_compensado: String,
    pub credito_gerado: String,
}
