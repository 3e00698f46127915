// src/handlers/clients.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    db::user_repo::ClientUpdate,
    middleware::role::{AdminRole, RequireRole},
    models::auth::{User, UserStatus},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "cliente@exemplo.com")]
    pub username: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "João Silva")]
    pub name: String,

    pub avatar: Option<String>,
    pub cpf_cnpj: Option<String>,
    pub phone: Option<String>,
    pub plant_address: Option<String>,
    pub plant_capacity: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub cpf_cnpj: Option<String>,
    pub phone: Option<String>,
    pub plant_address: Option<String>,
    pub plant_capacity: Option<String>,
    pub status: Option<UserStatus>,
}

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses(
        (status = 200, description = "Todos os usuários com papel client", body = Vec<User>),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
) -> Result<Json<Vec<User>>, AppError> {
    let clients = app_state.client_service.list_clients().await?;
    Ok(Json(clients))
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = User),
        (status = 400, description = "Dados inválidos ou e-mail já cadastrado"),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let client = app_state
        .client_service
        .create_client(
            &payload.username,
            &payload.password,
            &payload.name,
            payload.avatar.as_deref(),
            payload.cpf_cnpj.as_deref(),
            payload.phone.as_deref(),
            payload.plant_address.as_deref(),
            payload.plant_capacity.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = UpdateClientPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = User),
        (status = 403, description = "Apenas admin"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let updated = app_state
        .client_service
        .update_client(
            id,
            ClientUpdate {
                name: payload.name,
                avatar: payload.avatar,
                cpf_cnpj: payload.cpf_cnpj,
                phone: payload.phone,
                plant_address: payload.plant_address,
                plant_capacity: payload.plant_capacity,
                status: payload.status,
            },
        )
        .await?;

    Ok(Json(updated))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 403, description = "Apenas admin"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.client_service.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
