// src/services/ad_platforms.rs

//! Cliente HTTP das plataformas de anúncio (Meta Graph API e GA4 Data API).
//!
//! Só busca e devolve as linhas cruas; a normalização fica em
//! `metrics_normalizer`.

use std::time::Duration;

use anyhow::anyhow;
use chrono::Utc;
use reqwest::Url;
use serde_json::{Value, json};

use crate::{common::error::AppError, config::Config};

// Início das janelas de consulta
const INSIGHTS_SINCE: &str = "2025-01-01";
const ACCOUNT_SINCE: &str = "2024-01-01";

const FACEBOOK_FIELDS: &str = "clicks,impressions,spend,actions,date_start";
const META_CAMPAIGN_FIELDS: &str = "campaign_id,campaign_name,adset_id,impressions,clicks,spend,actions,reach,frequency,cpc,cpm";
const META_ACCOUNT_FIELDS: &str = "campaign_id,campaign_name,impressions,clicks,spend,actions,reach,frequency,cpc,cpm";
const META_ADS_SYNC_FIELDS: &str = "campaign_id,campaign_name,clicks,impressions,spend,actions,date_start,date_stop";
const META_ADS_METRIC_FIELDS: &str = "clicks,impressions,spend,actions";
const META_ADS_CAMPAIGN_FIELDS: &str = "name,status,effective_status,spend";

#[derive(Clone)]
pub struct AdPlatformClient {
    http: reqwest::Client,
    graph_url: String,
    google_url: String,
    google_property_id: Option<String>,
    google_access_token: Option<String>,
}

/// Nó da conta de anúncios no formato `act_<id>`.
pub fn account_node(ad_account_id: &str) -> String {
    if ad_account_id.starts_with("act_") {
        ad_account_id.to_string()
    } else {
        format!("act_{ad_account_id}")
    }
}

fn time_range(since: &str) -> String {
    let until = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    json!({ "since": since, "until": until }).to_string()
}

fn campaign_filter(campaign_id: &str) -> String {
    json!([{ "field": "campaign.id", "operator": "EQUAL", "value": [campaign_id] }]).to_string()
}

impl AdPlatformClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            graph_url: config.meta_graph_url.trim_end_matches('/').to_string(),
            google_url: config.google_analytics_url.trim_end_matches('/').to_string(),
            google_property_id: config.google_property_id.clone(),
            google_access_token: config.google_access_token.clone(),
        })
    }

    // =========================================================================
    //  META GRAPH API
    // =========================================================================

    /// Insights de uma campanha (rota de sync "facebook").
    pub async fn facebook_campaign_insights(
        &self,
        ad_account_id: &str,
        access_token: &str,
        campaign_id: &str,
    ) -> Result<Vec<Value>, AppError> {
        let path = format!("v16.0/{ad_account_id}/insights");
        self.graph_get(
            &path,
            &[
                ("fields", FACEBOOK_FIELDS.to_string()),
                ("access_token", access_token.to_string()),
                ("time_range", time_range(INSIGHTS_SINCE)),
                ("level", "campaign".to_string()),
                ("filtering", campaign_filter(campaign_id)),
            ],
        )
        .await
    }

    pub async fn meta_campaign_insights(
        &self,
        ad_account_id: &str,
        access_token: &str,
        campaign_id: &str,
    ) -> Result<Vec<Value>, AppError> {
        let path = format!("v16.0/{ad_account_id}/insights");
        self.graph_get(
            &path,
            &[
                ("fields", META_CAMPAIGN_FIELDS.to_string()),
                ("access_token", access_token.to_string()),
                ("time_range", time_range(INSIGHTS_SINCE)),
                ("level", "campaign".to_string()),
                ("filtering", campaign_filter(campaign_id)),
            ],
        )
        .await
    }

    /// Todas as campanhas da conta, cada uma com `insights` aninhado.
    pub async fn meta_account_campaigns(&self, ad_account_id: &str, access_token: &str) -> Result<Vec<Value>, AppError> {
        let path = format!("v18.0/{}/campaigns", account_node(ad_account_id));
        self.graph_get(
            &path,
            &[
                ("fields", format!("{META_ACCOUNT_FIELDS},insights{{{META_ACCOUNT_FIELDS}}}")),
                ("access_token", access_token.to_string()),
                ("time_range", time_range(ACCOUNT_SINCE)),
                ("limit", "100".to_string()),
            ],
        )
        .await
    }

    /// Insights por campanha da conta (rota /meta-ads/sync).
    pub async fn meta_ads_insights(&self, ad_account_id: &str, access_token: &str) -> Result<Vec<Value>, AppError> {
        let path = format!("v18.0/{}/insights", account_node(ad_account_id));
        self.graph_get(
            &path,
            &[
                ("fields", META_ADS_SYNC_FIELDS.to_string()),
                ("access_token", access_token.to_string()),
                ("time_range", time_range(INSIGHTS_SINCE)),
                ("level", "campaign".to_string()),
            ],
        )
        .await
    }

    /// Totais agregados da conta (uma linha).
    pub async fn meta_ads_account_totals(&self, ad_account_id: &str, access_token: &str) -> Result<Vec<Value>, AppError> {
        let path = format!("v18.0/{}/insights", account_node(ad_account_id));
        self.graph_get(
            &path,
            &[
                ("fields", META_ADS_METRIC_FIELDS.to_string()),
                ("access_token", access_token.to_string()),
                ("time_range", time_range(INSIGHTS_SINCE)),
            ],
        )
        .await
    }

    pub async fn meta_ads_campaigns(&self, ad_account_id: &str, access_token: &str) -> Result<Vec<Value>, AppError> {
        let path = format!("v18.0/{}/campaigns", account_node(ad_account_id));
        self.graph_get(
            &path,
            &[
                ("fields", META_ADS_CAMPAIGN_FIELDS.to_string()),
                ("access_token", access_token.to_string()),
            ],
        )
        .await
    }

    async fn graph_get(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<Value>, AppError> {
        let url = Url::parse_with_params(&format!("{}/{path}", self.graph_url), params)
            .map_err(|e| AppError::InternalServerError(anyhow!("invalid Graph API url: {e}")))?;

        let response = self.http.get(url).send().await?;
        let body = read_body(response, "Meta Graph API").await?;

        Ok(body
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    // =========================================================================
    //  GOOGLE ANALYTICS (GA4 Data API)
    // =========================================================================

    /// Relatório dos últimos 30 dias por campanha: sessions e activeUsers.
    pub async fn google_campaign_report(&self) -> Result<Vec<Value>, AppError> {
        let (Some(property_id), Some(token)) = (&self.google_property_id, &self.google_access_token) else {
            return Err(AppError::BadRequest(
                "Google Analytics is not configured (GOOGLE_PROPERTY_ID / GOOGLE_ACCESS_TOKEN)".to_string(),
            ));
        };

        let url = format!("{}/v1beta/properties/{property_id}:runReport", self.google_url);
        let request = json!({
            "dateRanges": [{ "startDate": "30daysAgo", "endDate": "today" }],
            "dimensions": [{ "name": "campaignName" }],
            "metrics": [{ "name": "sessions" }, { "name": "activeUsers" }],
        });

        let response = self.http.post(url).bearer_auth(token).json(&request).send().await?;
        let body = read_body(response, "Google Analytics API").await?;

        Ok(body
            .get("rows")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}

/// Corpo JSON da resposta; status fora de 2xx vira `Upstream` com o corpo em `details`.
async fn read_body(response: reqwest::Response, platform: &str) -> Result<Value, AppError> {
    let status = response.status();
    let text = response.text().await?;
    let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text));

    if !status.is_success() {
        return Err(AppError::Upstream {
            message: format!("{platform} returned {status}"),
            details: Some(body),
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_node_adds_prefix_once() {
        assert_eq!(account_node("123"), "act_123");
        assert_eq!(account_node("act_123"), "act_123");
    }

    #[test]
    fn time_range_is_a_json_window() {
        let range: Value = serde_json::from_str(&time_range(INSIGHTS_SINCE)).unwrap();
        assert_eq!(range["since"], "2025-01-01");
        assert_eq!(range["until"].as_str().map(str::len), Some(10));
    }

    #[test]
    fn campaign_filter_targets_the_campaign_id() {
        let filter: Value = serde_json::from_str(&campaign_filter("987")).unwrap();
        assert_eq!(filter[0]["field"], "campaign.id");
        assert_eq!(filter[0]["value"][0], "987");
    }
}
