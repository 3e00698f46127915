// src/handlers/billing.rs

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::billing::{EnrichedBillingReport, SetNicknamePayload, UnitNickname},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BillingReportsQuery {
    // Só tem efeito para admin: um UUID filtra por usuário, "all" (ou
    // ausente) retorna todos. Para client o escopo é sempre o próprio id.
    pub user_id: Option<String>,
}

// GET /api/billing-reports
#[utoipa::path(
    get,
    path = "/api/billing-reports",
    tag = "Billing",
    params(BillingReportsQuery),
    responses(
        (status = 200, description = "Faturas enriquecidas (UCs com apelido, histórico, consumo recalculado)", body = Vec<EnrichedBillingReport>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_billing_reports(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<BillingReportsQuery>,
) -> Result<Json<Vec<EnrichedBillingReport>>, AppError> {
    let reports = app_state
        .billing_service
        .get_enriched_reports(user.role, user.id, query.user_id.as_deref())
        .await?;
    Ok(Json(reports))
}

// POST /api/unit-nicknames
#[utoipa::path(
    post,
    path = "/api/unit-nicknames",
    tag = "Billing",
    request_body = SetNicknamePayload,
    responses(
        (status = 200, description = "Apelido gravado (upsert por usuário + código da UC)", body = UnitNickname),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_unit_nickname(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SetNicknamePayload>,
) -> Result<Json<UnitNickname>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let nickname = app_state
        .billing_service
        .set_nickname(
            user.role,
            user.id,
            payload.user_id,
            &payload.unit_code,
            &payload.nickname,
        )
        .await?;
    Ok(Json(nickname))
}
