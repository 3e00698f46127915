// src/handlers/alerts.rs

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, role::{AdminRole, RequireRole}},
    models::alert::Alert,
};

// GET /api/alerts
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Alerts",
    responses(
        (status = 200, description = "Alertas visíveis ao solicitante, mais recentes primeiro", body = Vec<Alert>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Alert>>, AppError> {
    let alerts = app_state
        .alert_service
        .list_alerts(user.role, user.id)
        .await?;
    Ok(Json(alerts))
}

// PATCH /api/alerts/{id}/resolve
#[utoipa::path(
    patch,
    path = "/api/alerts/{id}/resolve",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "ID do alerta")),
    responses(
        (status = 200, description = "Alerta resolvido", body = Alert),
        (status = 403, description = "Apenas admin pode resolver alertas"),
        (status = 404, description = "Alerta não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn resolve_alert(
    State(app_state): State<AppState>,
    RequireRole(admin, ..): RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<Alert>, AppError> {
    let alert = app_state
        .alert_service
        .resolve_alert(admin.role, id)
        .await?;
    Ok(Json(alert))
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    use super::*;
    use crate::models::auth::{Role, User, UserStatus};

    // O guardião precisa ser construível e desestruturável fora do módulo
    // middleware::role, como os handlers fazem; campos privados quebrariam
    // o padrão `RequireRole(user, ..)` daqui.
    #[test]
    fn guardiao_e_desestruturavel_nos_handlers() {
        let user = User {
            id: Uuid::new_v4(),
            username: "admin@teste.com".into(),
            password_hash: "hash".into(),
            role: Role::Admin,
            name: "Administrador Sistema".into(),
            avatar: None,
            cpf_cnpj: None,
            phone: None,
            plant_address: None,
            plant_capacity: None,
            status: UserStatus::Active,
        };

        let guard: RequireRole<AdminRole> = RequireRole(user, PhantomData);
        let RequireRole(admin, ..) = guard;
        assert_eq!(admin.role, Role::Admin);
    }
}
