// src/handlers/meta_ads.rs

use axum::{extract::State, http::HeaderMap};

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath},
    },
    config::AppState,
    middleware::rbac::{CanViewAnalytics, RequireCapability},
    models::analytics::{MetaAdsCampaignPerformance, MetaAdsMetrics, MetaAdsSyncPayload, MetaAdsSyncResponse},
};

// O token da conta vem num cabeçalho próprio, não no Authorization
const ACCESS_TOKEN_HEADER: &str = "accesstoken";

fn access_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::BadRequest("accesstoken header is required".to_string()))
}

// POST /api/meta-ads/sync
#[utoipa::path(
    post,
    path = "/api/meta-ads/sync",
    tag = "Meta Ads",
    request_body = MetaAdsSyncPayload,
    responses(
        (status = 200, description = "Insights gravados", body = MetaAdsSyncResponse),
        (status = 400, description = "Token ou conta ausentes"),
        (status = 500, description = "Falha na API externa")
    ),
    security(("api_jwt" = []))
)]
pub async fn sync(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    AppJson(payload): AppJson<MetaAdsSyncPayload>,
) -> Result<AppJson<MetaAdsSyncResponse>, AppError> {
    Ok(AppJson(app_state.analytics_service.meta_ads_sync(payload).await?))
}

// GET /api/meta-ads/metrics/{adAccountId}
#[utoipa::path(
    get,
    path = "/api/meta-ads/metrics/{adAccountId}",
    tag = "Meta Ads",
    params(
        ("adAccountId" = String, Path, description = "Conta de anúncios"),
        ("accesstoken" = String, Header, description = "Token da Graph API")
    ),
    responses(
        (status = 200, description = "Totais e taxas da conta", body = MetaAdsMetrics),
        (status = 400, description = "Token ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn metrics(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    headers: HeaderMap,
    AppPath(ad_account_id): AppPath<String>,
) -> Result<AppJson<MetaAdsMetrics>, AppError> {
    let token = access_token(&headers)?;
    let metrics = app_state
        .analytics_service
        .meta_ads_metrics(&ad_account_id, token)
        .await?;
    Ok(AppJson(metrics))
}

// GET /api/meta-ads/campaigns/{adAccountId}
#[utoipa::path(
    get,
    path = "/api/meta-ads/campaigns/{adAccountId}",
    tag = "Meta Ads",
    params(
        ("adAccountId" = String, Path, description = "Conta de anúncios"),
        ("accesstoken" = String, Header, description = "Token da Graph API")
    ),
    responses(
        (status = 200, description = "Campanhas da conta com gasto", body = MetaAdsCampaignPerformance),
        (status = 400, description = "Token ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn campaigns(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewAnalytics>,
    headers: HeaderMap,
    AppPath(ad_account_id): AppPath<String>,
) -> Result<AppJson<MetaAdsCampaignPerformance>, AppError> {
    let token = access_token(&headers)?;
    let performance = app_state
        .analytics_service
        .meta_ads_campaigns(&ad_account_id, token)
        .await?;
    Ok(AppJson(performance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn access_token_header_is_required() {
        let mut headers = HeaderMap::new();
        assert!(matches!(access_token(&headers), Err(AppError::BadRequest(_))));

        headers.insert(ACCESS_TOKEN_HEADER, HeaderValue::from_static("  "));
        assert!(access_token(&headers).is_err());

        headers.insert(ACCESS_TOKEN_HEADER, HeaderValue::from_static("EAAB123"));
        assert_eq!(access_token(&headers).unwrap(), "EAAB123");
    }
}
