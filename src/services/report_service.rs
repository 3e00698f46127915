// src/services/report_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::{auth::Role, report::Report},
};

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository) -> Self {
        Self { repo }
    }

    // Mesma regra de visibilidade dos alertas
    pub async fn list_reports(
        &self,
        role: Role,
        requester_id: Uuid,
    ) -> Result<Vec<Report>, AppError> {
        self.repo.list_reports(role.visibility_scope(requester_id)).await
    }
}
