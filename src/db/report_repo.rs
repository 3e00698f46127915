// src/db/report_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::report::Report};

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Mesma regra de visibilidade dos alertas: Some(u) filtra pelo dono,
    // None retorna todos (admin). Mais recentes primeiro.
    pub async fn list_reports(&self, scope: Option<Uuid>) -> Result<Vec<Report>, AppError> {
        let reports = match scope {
            Some(user_id) => {
                sqlx::query_as::<_, Report>(
                    "SELECT * FROM reports WHERE user_id = $1 ORDER BY date DESC",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY date DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(reports)
    }
}
