// src/handlers/analytics.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath},
    },
    config::AppState,
    middleware::rbac::{CanViewAnalytics, CanViewDashboard, RequireCapability},
    models::{
        analytics::{AddAnalyticsPayload, AnalyticsRecord, AnalyticsSaved, MetaStats, SyncResponse},
        dashboard::DashboardStats,
    },
};

// =============================================================================
//  PAINEL E CONSULTAS
// =============================================================================

// GET /api/analytics/dashboard
#[utoipa::path(
    get,
    path = "/api/analytics/dashboard",
    tag = "Analytics",
    responses((status = 200, description = "Indicadores do painel", body = DashboardStats)),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewDashboard>,
) -> Result<AppJson<DashboardStats>, AppError> {
    Ok(AppJson(app_state.analytics_service.dashboard_stats().await?))
}

// POST /api/analytics/add
#[utoipa::path(
    post,
    path = "/api/analytics/add",
    tag = "Analytics",
    request_body = AddAnalyticsPayload,
    responses(
        (status = 201, description = "Registro gravado", body = AnalyticsSaved),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_analytics(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    AppJson(payload): AppJson<AddAnalyticsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let saved = app_state.analytics_service.add_record(payload).await?;
    Ok((StatusCode::CREATED, AppJson(saved)))
}

// GET /api/analytics/{campaignId}
#[utoipa::path(
    get,
    path = "/api/analytics/{campaignId}",
    tag = "Analytics",
    params(("campaignId" = String, Path, description = "UUID da campanha local ou id na plataforma")),
    responses((status = 200, description = "Registros da campanha", body = Vec<AnalyticsRecord>)),
    security(("api_jwt" = []))
)]
pub async fn get_by_campaign(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    AppPath(campaign_id): AppPath<String>,
) -> Result<AppJson<Vec<AnalyticsRecord>>, AppError> {
    Ok(AppJson(app_state.analytics_service.by_campaign(&campaign_id).await?))
}

// GET /api/analytics/meta/stats
#[utoipa::path(
    get,
    path = "/api/analytics/meta/stats",
    tag = "Analytics",
    responses((status = 200, description = "Totais das métricas da Meta", body = MetaStats)),
    security(("api_jwt" = []))
)]
pub async fn get_meta_stats(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
) -> Result<AppJson<MetaStats>, AppError> {
    Ok(AppJson(app_state.analytics_service.meta_stats_summary().await?))
}

// =============================================================================
//  SINCRONIZAÇÃO COM AS PLATAFORMAS
// =============================================================================

// GET /api/analytics/sync/facebook/{campaignId}/{accessToken}/{adAccountId}
#[utoipa::path(
    get,
    path = "/api/analytics/sync/facebook/{campaignId}/{accessToken}/{adAccountId}",
    tag = "Analytics",
    params(
        ("campaignId" = String, Path, description = "Id da campanha na plataforma"),
        ("accessToken" = String, Path, description = "Token da Graph API"),
        ("adAccountId" = String, Path, description = "Conta de anúncios")
    ),
    responses(
        (status = 200, description = "Sincronizado", body = SyncResponse),
        (status = 500, description = "Falha na API externa")
    ),
    security(("api_jwt" = []))
)]
pub async fn sync_facebook(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    AppPath((campaign_id, access_token, ad_account_id)): AppPath<(String, String, String)>,
) -> Result<AppJson<SyncResponse>, AppError> {
    let response = app_state
        .analytics_service
        .sync_facebook(&campaign_id, &access_token, &ad_account_id)
        .await?;
    Ok(AppJson(response))
}

// GET /api/analytics/sync/google/{campaignId}
#[utoipa::path(
    get,
    path = "/api/analytics/sync/google/{campaignId}",
    tag = "Analytics",
    params(("campaignId" = String, Path, description = "Campanha que recebe os registros")),
    responses(
        (status = 200, description = "Sincronizado", body = SyncResponse),
        (status = 400, description = "Google Analytics não configurado"),
        (status = 500, description = "Falha na API externa")
    ),
    security(("api_jwt" = []))
)]
pub async fn sync_google(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    AppPath(campaign_id): AppPath<String>,
) -> Result<AppJson<SyncResponse>, AppError> {
    Ok(AppJson(app_state.analytics_service.sync_google(&campaign_id).await?))
}

// GET /api/analytics/sync/meta/{campaignId}/{accessToken}/{adAccountId}
#[utoipa::path(
    get,
    path = "/api/analytics/sync/meta/{campaignId}/{accessToken}/{adAccountId}",
    tag = "Analytics",
    params(
        ("campaignId" = String, Path, description = "Id da campanha na plataforma"),
        ("accessToken" = String, Path, description = "Token da Graph API"),
        ("adAccountId" = String, Path, description = "Conta de anúncios")
    ),
    responses(
        (status = 200, description = "Sincronizado", body = SyncResponse),
        (status = 500, description = "Falha na API externa")
    ),
    security(("api_jwt" = []))
)]
pub async fn sync_meta(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    AppPath((campaign_id, access_token, ad_account_id)): AppPath<(String, String, String)>,
) -> Result<AppJson<SyncResponse>, AppError> {
    let response = app_state
        .analytics_service
        .sync_meta(&campaign_id, &access_token, &ad_account_id)
        .await?;
    Ok(AppJson(response))
}

// GET /api/analytics/sync/meta-all/{accessToken}/{adAccountId}
#[utoipa::path(
    get,
    path = "/api/analytics/sync/meta-all/{accessToken}/{adAccountId}",
    tag = "Analytics",
    params(
        ("accessToken" = String, Path, description = "Token da Graph API"),
        ("adAccountId" = String, Path, description = "Conta de anúncios")
    ),
    responses(
        (status = 200, description = "Sincronizado", body = SyncResponse),
        (status = 500, description = "Falha na API externa")
    ),
    security(("api_jwt" = []))
)]
pub async fn sync_meta_all(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    AppPath((access_token, ad_account_id)): AppPath<(String, String)>,
) -> Result<AppJson<SyncResponse>, AppError> {
    let response = app_state
        .analytics_service
        .sync_meta_all(&access_token, &ad_account_id)
        .await?;
    Ok(AppJson(response))
}

// POST /api/analytics/sync-and-get/meta/{accessToken}/{adAccountId}
#[utoipa::path(
    post,
    path = "/api/analytics/sync-and-get/meta/{accessToken}/{adAccountId}",
    tag = "Analytics",
    params(
        ("accessToken" = String, Path, description = "Token da Graph API"),
        ("adAccountId" = String, Path, description = "Conta de anúncios")
    ),
    responses(
        (status = 200, description = "Sincronizado, com os totais atualizados", body = SyncResponse),
        (status = 500, description = "Falha na API externa")
    ),
    security(("api_jwt" = []))
)]
pub async fn sync_and_get_meta(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    AppPath((access_token, ad_account_id)): AppPath<(String, String)>,
) -> Result<AppJson<SyncResponse>, AppError> {
    let response = app_state
        .analytics_service
        .sync_and_get_meta(&access_token, &ad_account_id)
        .await?;
    Ok(AppJson(response))
}
