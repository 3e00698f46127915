// src/db/billing_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::billing::{
        BillingHistory, BillingReport, BillingUnit, NewBillingHistory, NewBillingReport,
        NewBillingUnit, UnitNickname,
    },
};

/// Seam de acesso aos dados de faturamento. O agregador enxerga só este
/// trait; em testes um double em memória conta as chamadas (para provar a
/// memoização de apelidos por dono).
#[async_trait]
pub trait BillingStore: Send + Sync {
    /// Faturas, mais recentes primeiro. `None` = sem filtro de usuário.
    async fn get_billing_reports(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<Vec<BillingReport>, AppError>;

    async fn get_billing_units(&self, report_id: Uuid) -> Result<Vec<BillingUnit>, AppError>;

    async fn get_billing_history(&self, report_id: Uuid) -> Result<Vec<BillingHistory>, AppError>;

    /// Apelidos do usuário dono do relatório (não do solicitante).
    async fn get_unit_nicknames(&self, user_id: Uuid) -> Result<Vec<UnitNickname>, AppError>;

    /// Upsert atômico por (user_id, unit_code); o id da linha é estável
    /// entre re-apelidações.
    async fn upsert_unit_nickname(
        &self,
        user_id: Uuid,
        unit_code: &str,
        nickname: &str,
    ) -> Result<UnitNickname, AppError>;
}

#[derive(Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Inserções usadas pelo seed e pela importação de faturas ---

    pub async fn create_billing_report(
        &self,
        report: NewBillingReport,
    ) -> Result<BillingReport, AppError> {
        let created = sqlx::query_as::<_, BillingReport>(
            r#"
            INSERT INTO billing_reports
                (user_id, mes, ano, energia_injetada, energia_consumida, saldo_credito, month_year, pdf_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(report.user_id)
        .bind(report.mes)
        .bind(report.ano)
        .bind(report.energia_injetada)
        .bind(report.energia_consumida)
        .bind(report.saldo_credito)
        .bind(report.month_year)
        .bind(report.pdf_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn create_billing_unit(
        &self,
        unit: NewBillingUnit,
    ) -> Result<BillingUnit, AppError> {
        let created = sqlx::query_as::<_, BillingUnit>(
            r#"
            INSERT INTO billing_units
                (billing_report_id, codigo_cliente, creditos_recebidos, consumo_mes, saldo_acumulado, eh_geradora)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(unit.billing_report_id)
        .bind(unit.codigo_cliente)
        .bind(unit.creditos_recebidos)
        .bind(unit.consumo_mes)
        .bind(unit.saldo_acumulado)
        .bind(unit.eh_geradora)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn create_billing_history(
        &self,
        history: NewBillingHistory,
    ) -> Result<BillingHistory, AppError> {
        let created = sqlx::query_as::<_, BillingHistory>(
            r#"
            INSERT INTO billing_history
                (billing_report_id, mes, ano, energia_consumida, energia_injetada, kwh_compensado, credito_gerado)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(history.billing_report_id)
        .bind(history.mes)
        .bind(history.ano)
        .bind(history.energia_consumida)
        .bind(history.energia_injetada)
        .bind(history.kwh_compensado)
        .bind(history.credito_gerado)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}

#[async_trait]
impl BillingStore for BillingRepository {
    async fn get_billing_reports(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<Vec<BillingReport>, AppError> {
        let reports = match user_id {
            Some(user_id) => {
                sqlx::query_as::<_, BillingReport>(
                    "SELECT * FROM billing_reports WHERE user_id = $1 ORDER BY created_at DESC",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, BillingReport>(
                    "SELECT * FROM billing_reports ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(reports)
    }

    async fn get_billing_units(&self, report_id: Uuid) -> Result<Vec<BillingUnit>, AppError> {
        let units = sqlx::query_as::<_, BillingUnit>(
            "SELECT * FROM billing_units WHERE billing_report_id = $1",
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(units)
    }

    async fn get_billing_history(&self, report_id: Uuid) -> Result<Vec<BillingHistory>, AppError> {
        let history = sqlx::query_as::<_, BillingHistory>(
            "SELECT * FROM billing_history WHERE billing_report_id = $1",
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(history)
    }

    async fn get_unit_nicknames(&self, user_id: Uuid) -> Result<Vec<UnitNickname>, AppError> {
        let nicknames = sqlx::query_as::<_, UnitNickname>(
            "SELECT * FROM unit_nicknames WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(nicknames)
    }

    async fn upsert_unit_nickname(
        &self,
        user_id: Uuid,
        unit_code: &str,
        nickname: &str,
    ) -> Result<UnitNickname, AppError> {
        // ON CONFLICT fecha a corrida de dois inserts concorrentes;
        // a constraint UNIQUE (user_id, unit_code) está na migração.
        let row = sqlx::query_as::<_, UnitNickname>(
            r#"
            INSERT INTO unit_nicknames (user_id, unit_code, nickname)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, unit_code)
            DO UPDATE SET nickname = EXCLUDED.nickname
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(unit_code)
        .bind(nickname)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
