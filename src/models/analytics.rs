// src/models/analytics.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Uma linha do log de ingestão de métricas (nunca atualizada)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRecord {
    pub id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub external_campaign_id: Option<String>,
    pub source: String,
    pub clicks: i64,
    pub impressions: i64,
    pub cost: Decimal,
    pub conversions: i64,
    pub reach: i64,
    pub frequency: f64,
    pub cpc: Decimal,
    pub cpm: Decimal,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Registro normalizado, pronto para o INSERT em lote.
#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAnalyticsRecord {
    pub campaign_id: Option<Uuid>,
    pub external_campaign_id: Option<String>,
    pub source: String,
    pub clicks: i64,
    pub impressions: i64,
    pub cost: Decimal,
    pub conversions: i64,
    pub reach: i64,
    pub frequency: f64,
    pub cpc: Decimal,
    pub cpm: Decimal,
    pub date: DateTime<Utc>,
}

// POST /analytics/add
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddAnalyticsPayload {
    pub campaign_id: Option<Uuid>,
    #[validate(length(min = 1, message = "source is required"))]
    #[schema(example = "facebook")]
    pub source: String,
    #[serde(default)]
    pub clicks: i64,
    #[serde(default)]
    pub impressions: i64,
    #[serde(default)]
    pub cost: Decimal,
    #[serde(default)]
    pub conversions: i64,
    #[serde(default)]
    pub reach: i64,
    #[serde(default)]
    pub frequency: f64,
    #[serde(default)]
    pub cpc: Decimal,
    #[serde(default)]
    pub cpm: Decimal,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema, PartialEq)]
pub struct MetaStats {
    #[serde(rename = "totalClicks")]
    pub total_clicks: i64,
    #[serde(rename = "totalImpressions")]
    pub total_impressions: i64,
    #[serde(rename = "totalSpend")]
    pub total_spend: Decimal,
    #[serde(rename = "totalConversions")]
    pub total_conversions: i64,
    #[serde(rename = "avgCPC")]
    pub avg_cpc: Decimal,
    #[serde(rename = "avgCPM")]
    pub avg_cpm: Decimal,
    #[serde(rename = "totalReach")]
    pub total_reach: i64,
}

// Resposta das rotas de sincronização
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncResponse {
    pub message: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<NewAnalyticsRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MetaStats>,
}

// Resposta de POST /analytics/add
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsSaved {
    pub message: String,
    pub analytics: AnalyticsRecord,
}

// --- META ADS (rotas auxiliares) ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaAdsSyncPayload {
    #[validate(length(min = 1, message = "access token is required"))]
    pub access_token: String,
    #[validate(length(min = 1, message = "ad account id is required"))]
    pub ad_account_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaAdsSyncResponse {
    pub message: String,
    pub records_count: usize,
    pub data: Vec<NewAnalyticsRecord>,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetaAdsMetrics {
    pub total_clicks: i64,
    pub total_impressions: i64,
    pub total_spend: Decimal,
    pub total_conversions: i64,
    pub cpc: Decimal,
    pub cpm: Decimal,
    pub conversion_rate: Decimal,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetaAdsCampaign {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub effective_status: Option<String>,
    pub spend: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaAdsCampaignPerformance {
    pub total_campaigns: usize,
    pub campaigns: Vec<MetaAdsCampaign>,
}
