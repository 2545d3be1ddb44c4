// src/handlers/clients.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath},
    },
    config::AppState,
    handlers::MessageResponse,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CanManageClients, RequireCapability},
    },
    models::client::{Client, CreateClientPayload, UpdateClientPayload},
};

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses((status = 200, description = "Lista de clientes", body = Vec<Client>)),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageClients>,
) -> Result<AppJson<Vec<Client>>, AppError> {
    Ok(AppJson(app_state.client_service.list().await?))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageClients>,
    AppPath(id): AppPath<Uuid>,
) -> Result<AppJson<Client>, AppError> {
    Ok(AppJson(app_state.client_service.get_by_id(id).await?))
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageClients>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(payload): AppJson<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.create(payload, Some(claims.id)).await?;
    Ok((StatusCode::CREATED, AppJson(client)))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    request_body = UpdateClientPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageClients>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateClientPayload>,
) -> Result<AppJson<Client>, AppError> {
    Ok(AppJson(app_state.client_service.update(id, payload).await?))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente removido", body = MessageResponse),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageClients>,
    AppPath(id): AppPath<Uuid>,
) -> Result<AppJson<MessageResponse>, AppError> {
    app_state.client_service.delete(id).await?;
    Ok(AppJson(MessageResponse::new("Client deleted")))
}
