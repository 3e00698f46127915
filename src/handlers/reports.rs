// src/handlers/reports.rs

use axum::{Json, extract::State};

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::report::Report,
};

// GET /api/reports — mesma regra de visibilidade dos alertas
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    responses(
        (status = 200, description = "Relatórios visíveis ao solicitante, mais recentes primeiro", body = Vec<Report>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_reports(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Report>>, AppError> {
    let reports = app_state
        .report_service
        .list_reports(user.role, user.id)
        .await?;
    Ok(Json(reports))
}
