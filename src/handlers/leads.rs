// src/handlers/leads.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath, AppQuery},
    },
    config::AppState,
    handlers::MessageResponse,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CanManageLeads, RequireCapability},
    },
    models::lead::{
        AddInteractionPayload, CreateLeadPayload, Lead, LeadStatusFilter, UpdateLeadPayload,
        UpdateLeadStatusPayload,
    },
    services::populate::Relations,
};

// =============================================================================
//  LEITURA
// =============================================================================

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses((status = 200, description = "Leads com responsáveis e campanha resolvidos", body = Vec<Lead>)),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageLeads>,
) -> Result<AppJson<Vec<Lead>>, AppError> {
    Ok(AppJson(app_state.lead_service.list(None, Relations::ALL).await?))
}

// GET /api/leads/filter/status?status=
#[utoipa::path(
    get,
    path = "/api/leads/filter/status",
    tag = "Leads",
    params(LeadStatusFilter),
    responses(
        (status = 200, description = "Leads no status pedido (todos, sem filtro)", body = Vec<Lead>),
        (status = 400, description = "Status desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn filter_leads_by_status(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageLeads>,
    AppQuery(filter): AppQuery<LeadStatusFilter>,
) -> Result<AppJson<Vec<Lead>>, AppError> {
    let leads = app_state.lead_service.list(filter.status, Relations::USERS).await?;
    Ok(AppJson(leads))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageLeads>,
    AppPath(id): AppPath<Uuid>,
) -> Result<AppJson<Lead>, AppError> {
    Ok(AppJson(app_state.lead_service.get_by_id(id).await?))
}

// =============================================================================
//  ESCRITA
// =============================================================================

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Nome ausente ou valor de venda inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageLeads>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(payload): AppJson<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.create(payload, Some(claims.id)).await?;
    Ok((StatusCode::CREATED, AppJson(lead)))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    request_body = UpdateLeadPayload,
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 400, description = "Conversão sem valor de venda"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageLeads>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateLeadPayload>,
) -> Result<AppJson<Lead>, AppError> {
    Ok(AppJson(app_state.lead_service.update(id, payload).await?))
}

// PATCH /api/leads/{id}/status
#[utoipa::path(
    patch,
    path = "/api/leads/{id}/status",
    tag = "Leads",
    request_body = UpdateLeadStatusPayload,
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Status alterado", body = Lead),
        (status = 400, description = "Conversão sem valor de venda"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead_status(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageLeads>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateLeadStatusPayload>,
) -> Result<AppJson<Lead>, AppError> {
    Ok(AppJson(app_state.lead_service.update_status(id, payload).await?))
}

// POST /api/leads/{id}/interactions
#[utoipa::path(
    post,
    path = "/api/leads/{id}/interactions",
    tag = "Leads",
    request_body = AddInteractionPayload,
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Interação registrada", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_interaction(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageLeads>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<AddInteractionPayload>,
) -> Result<AppJson<Lead>, AppError> {
    Ok(AppJson(app_state.lead_service.add_interaction(id, payload).await?))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead removido", body = MessageResponse),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageLeads>,
    AppPath(id): AppPath<Uuid>,
) -> Result<AppJson<MessageResponse>, AppError> {
    app_state.lead_service.delete(id).await?;
    Ok(AppJson(MessageResponse::new("Lead deleted")))
}
