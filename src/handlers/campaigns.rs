// src/handlers/campaigns.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath},
    },
    config::AppState,
    handlers::MessageResponse,
    middleware::rbac::{CanManageCampaigns, RequireCapability},
    models::campaign::{Campaign, CampaignPayload},
};

// GET /api/campaigns
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "Campaigns",
    responses(
        (status = 200, description = "Lista de campanhas", body = Vec<Campaign>),
        (status = 403, description = "Somente admin e marketing")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_campaigns(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageCampaigns>,
) -> Result<AppJson<Vec<Campaign>>, AppError> {
    Ok(AppJson(app_state.campaign_service.list().await?))
}

// GET /api/campaigns/{id}
#[utoipa::path(
    get,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Campanha", body = Campaign),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_campaign(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageCampaigns>,
    AppPath(id): AppPath<Uuid>,
) -> Result<AppJson<Campaign>, AppError> {
    Ok(AppJson(app_state.campaign_service.get_by_id(id).await?))
}

// POST /api/campaigns
#[utoipa::path(
    post,
    path = "/api/campaigns",
    tag = "Campaigns",
    request_body = CampaignPayload,
    responses(
        (status = 201, description = "Campanha criada", body = Campaign),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_campaign(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageCampaigns>,
    AppJson(payload): AppJson<CampaignPayload>,
) -> Result<impl IntoResponse, AppError> {
    let campaign = app_state.campaign_service.create(payload).await?;
    Ok((StatusCode::CREATED, AppJson(campaign)))
}

// PUT /api/campaigns/{id}
#[utoipa::path(
    put,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    request_body = CampaignPayload,
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Campanha atualizada", body = Campaign),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_campaign(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageCampaigns>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<CampaignPayload>,
) -> Result<AppJson<Campaign>, AppError> {
    Ok(AppJson(app_state.campaign_service.update(id, payload).await?))
}

// DELETE /api/campaigns/{id}
#[utoipa::path(
    delete,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Campanha removida", body = MessageResponse),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_campaign(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageCampaigns>,
    AppPath(id): AppPath<Uuid>,
) -> Result<AppJson<MessageResponse>, AppError> {
    app_state.campaign_service.delete(id).await?;
    Ok(AppJson(MessageResponse::new("Campaign deleted")))
}
