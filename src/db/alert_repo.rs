// src/db/alert_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::alert::{Alert, NewAlert},
};

/// Seam de acesso aos alertas. O serviço enxerga só este trait, o que
/// permite substituir o Postgres por um double em testes.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Lista alertas, mais recentes primeiro. `scope = Some(u)` filtra
    /// pelo dono; `None` retorna todos (caminho de admin).
    async fn list_alerts(&self, scope: Option<Uuid>) -> Result<Vec<Alert>, AppError>;

    /// Marca o alerta como resolvido. Atualização monotônica: re-resolver
    /// um alerta já resolvido reaplica 'resolved' (idempotente).
    async fn resolve_alert(&self, id: Uuid) -> Result<Option<Alert>, AppError>;

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert, AppError>;

    async fn count_active(&self, scope: Option<Uuid>) -> Result<i64, AppError>;
}

#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for AlertRepository {
    async fn list_alerts(&self, scope: Option<Uuid>) -> Result<Vec<Alert>, AppError> {
        let alerts = match scope {
            Some(user_id) => {
                sqlx::query_as::<_, Alert>(
                    "SELECT * FROM alerts WHERE user_id = $1 ORDER BY created_at DESC",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Alert>("SELECT * FROM alerts ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(alerts)
    }

    async fn resolve_alert(&self, id: Uuid) -> Result<Option<Alert>, AppError> {
        let alert = sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET status = 'resolved' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(alert)
    }

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert, AppError> {
        let created = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (title, message, severity, status, plant_name, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(alert.title)
        .bind(alert.message)
        .bind(alert.severity)
        .bind(alert.status)
        .bind(alert.plant_name)
        .bind(alert.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn count_active(&self, scope: Option<Uuid>) -> Result<i64, AppError> {
        let count: (i64,) = match scope {
            Some(user_id) => {
                sqlx::query_as(
                    "SELECT COUNT(*) FROM alerts WHERE status = 'active' AND user_id = $1",
                )
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM alerts WHERE status = 'active'")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count.0)
    }
}
