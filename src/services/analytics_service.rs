// src/services/analytics_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{AnalyticsRepository, CampaignRepository, ClientRepository},
    models::{
        analytics::{
            AddAnalyticsPayload, AnalyticsRecord, AnalyticsSaved, MetaAdsCampaignPerformance, MetaAdsMetrics,
            MetaAdsSyncPayload, MetaAdsSyncResponse, MetaStats, NewAnalyticsRecord, SyncResponse,
        },
        campaign::{Campaign, CampaignStatus},
        dashboard::{CampaignPerformanceEntry, DashboardStats, SourceCount},
    },
    services::{
        ad_platforms::AdPlatformClient,
        metrics_normalizer::{
            self, FACEBOOK, META, META_ADS, SourceProfile, campaign_performance, normalize_google_rows,
            summarize_account_insights,
        },
    },
};

const META_SOURCE: &str = "meta";

/// Monta o painel a partir das campanhas e da contagem de clientes.
pub fn build_dashboard(campaigns: &[Campaign], total_clients: i64, by_source: Vec<SourceCount>) -> DashboardStats {
    let active_campaigns = campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Active)
        .count();

    let total_revenue: Decimal = campaigns.iter().filter_map(|c| c.budget).sum();

    let campaign_performance = campaigns
        .iter()
        .map(|c| CampaignPerformanceEntry {
            name: c.display_name().map(str::to_owned),
            budget: c.budget.unwrap_or_default(),
            status: c.status,
            platform: c.platform.clone().unwrap_or_else(|| "Unknown".to_string()),
        })
        .collect();

    // Sem agrupamento: todos os clientes contam como "Direct"
    let clients_by_source = if by_source.is_empty() {
        vec![SourceCount {
            source: Some("Direct".to_string()),
            count: total_clients,
        }]
    } else {
        by_source
    };

    DashboardStats {
        total_campaigns: campaigns.len(),
        active_campaigns,
        total_clients,
        total_revenue,
        campaign_performance,
        clients_by_source,
    }
}

/// Id de campanha vindo da URL: se for UUID aponta para a campanha local,
/// e sempre fica guardado como id externo.
fn attach_campaign(records: &mut [NewAnalyticsRecord], raw: &str) {
    let local = Uuid::parse_str(raw).ok();
    for record in records {
        record.campaign_id = local;
        record.external_campaign_id = Some(raw.to_string());
    }
}

#[derive(Clone)]
pub struct AnalyticsService {
    repo: AnalyticsRepository,
    campaign_repo: CampaignRepository,
    client_repo: ClientRepository,
    platforms: AdPlatformClient,
}

impl AnalyticsService {
    pub fn new(
        repo: AnalyticsRepository,
        campaign_repo: CampaignRepository,
        client_repo: ClientRepository,
        platforms: AdPlatformClient,
    ) -> Self {
        Self {
            repo,
            campaign_repo,
            client_repo,
            platforms,
        }
    }

    // =========================================================================
    //  PAINEL E CONSULTAS
    // =========================================================================

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let campaigns = self.campaign_repo.list_all().await?;
        let total_clients = self.client_repo.count_all().await?;
        let by_source = self.client_repo.count_by_source().await?;

        Ok(build_dashboard(&campaigns, total_clients, by_source))
    }

    pub async fn add_record(&self, payload: AddAnalyticsPayload) -> Result<AnalyticsSaved, AppError> {
        payload.validate()?;

        let record = NewAnalyticsRecord {
            campaign_id: payload.campaign_id,
            external_campaign_id: None,
            source: payload.source.trim().to_string(),
            clicks: payload.clicks,
            impressions: payload.impressions,
            cost: payload.cost,
            conversions: payload.conversions,
            reach: payload.reach,
            frequency: payload.frequency,
            cpc: payload.cpc,
            cpm: payload.cpm,
            date: payload.date.unwrap_or_else(Utc::now),
        };

        let analytics = self.repo.insert_one(&record).await?;
        Ok(AnalyticsSaved {
            message: "Analytics saved".to_string(),
            analytics,
        })
    }

    /// UUID busca pela campanha local; qualquer outro texto, pelo id da plataforma.
    pub async fn by_campaign(&self, campaign_id: &str) -> Result<Vec<AnalyticsRecord>, AppError> {
        match Uuid::parse_str(campaign_id) {
            Ok(id) => self.repo.find_by_campaign(id).await,
            Err(_) => self.repo.find_by_external_campaign(campaign_id).await,
        }
    }

    pub async fn meta_stats_summary(&self) -> Result<MetaStats, AppError> {
        self.repo.summarize_source(META_SOURCE).await
    }

    // =========================================================================
    //  INGESTÃO
    // =========================================================================

    /// Normaliza as linhas cruas e grava tudo num único INSERT.
    pub async fn ingest_external_metrics(
        &self,
        rows: &[Value],
        profile: &SourceProfile,
        campaign_id: Option<&str>,
    ) -> Result<Vec<NewAnalyticsRecord>, AppError> {
        let mut records = metrics_normalizer::normalize_rows(rows, profile, None, Utc::now());
        if let Some(raw) = campaign_id {
            attach_campaign(&mut records, raw);
        }
        self.store(records, profile.source).await
    }

    async fn store(&self, records: Vec<NewAnalyticsRecord>, source: &str) -> Result<Vec<NewAnalyticsRecord>, AppError> {
        let inserted = self.repo.insert_many(&records).await?;
        info!("Métricas sincronizadas: source={source} linhas={inserted}");
        Ok(records)
    }

    pub async fn sync_facebook(
        &self,
        campaign_id: &str,
        access_token: &str,
        ad_account_id: &str,
    ) -> Result<SyncResponse, AppError> {
        let rows = self
            .platforms
            .facebook_campaign_insights(ad_account_id, access_token, campaign_id)
            .await?;
        let records = self.ingest_external_metrics(&rows, &FACEBOOK, Some(campaign_id)).await?;

        Ok(SyncResponse {
            message: "Facebook sync ok".to_string(),
            count: records.len(),
            data: None,
            stats: None,
        })
    }

    pub async fn sync_google(&self, campaign_id: &str) -> Result<SyncResponse, AppError> {
        let rows = self.platforms.google_campaign_report().await?;

        let mut records = normalize_google_rows(&rows, None, Utc::now());
        attach_campaign(&mut records, campaign_id);
        let records = self.store(records, "google").await?;

        Ok(SyncResponse {
            message: "Google sync ok".to_string(),
            count: records.len(),
            data: None,
            stats: None,
        })
    }

    /// As linhas da Meta trazem o próprio id de campanha; o da URL só filtra a consulta.
    pub async fn sync_meta(
        &self,
        campaign_id: &str,
        access_token: &str,
        ad_account_id: &str,
    ) -> Result<SyncResponse, AppError> {
        let rows = self
            .platforms
            .meta_campaign_insights(ad_account_id, access_token, campaign_id)
            .await?;
        let records = self.ingest_external_metrics(&rows, &META, None).await?;

        Ok(SyncResponse {
            message: "Meta Ads sync successful".to_string(),
            count: records.len(),
            data: Some(records),
            stats: None,
        })
    }

    pub async fn sync_meta_all(&self, access_token: &str, ad_account_id: &str) -> Result<SyncResponse, AppError> {
        let rows = self.platforms.meta_account_campaigns(ad_account_id, access_token).await?;
        let records = self.ingest_external_metrics(&rows, &META, None).await?;

        Ok(SyncResponse {
            message: "Meta Ads sync successful".to_string(),
            count: records.len(),
            data: Some(records),
            stats: None,
        })
    }

    pub async fn sync_and_get_meta(&self, access_token: &str, ad_account_id: &str) -> Result<SyncResponse, AppError> {
        let rows = self.platforms.meta_account_campaigns(ad_account_id, access_token).await?;
        let records = self.ingest_external_metrics(&rows, &META, None).await?;
        let stats = self.meta_stats_summary().await?;

        Ok(SyncResponse {
            message: "Meta Ads sync successful and stats retrieved".to_string(),
            count: records.len(),
            data: None,
            stats: Some(stats),
        })
    }

    // =========================================================================
    //  META ADS (rotas auxiliares)
    // =========================================================================

    pub async fn meta_ads_sync(&self, payload: MetaAdsSyncPayload) -> Result<MetaAdsSyncResponse, AppError> {
        payload.validate()?;

        let rows = self
            .platforms
            .meta_ads_insights(&payload.ad_account_id, &payload.access_token)
            .await?;
        let records = self.ingest_external_metrics(&rows, &META_ADS, None).await?;

        Ok(MetaAdsSyncResponse {
            message: "Meta Ads data synchronized".to_string(),
            records_count: records.len(),
            data: records,
        })
    }

    pub async fn meta_ads_metrics(&self, ad_account_id: &str, access_token: &str) -> Result<MetaAdsMetrics, AppError> {
        let rows = self.platforms.meta_ads_account_totals(ad_account_id, access_token).await?;
        Ok(summarize_account_insights(rows.first()))
    }

    pub async fn meta_ads_campaigns(
        &self,
        ad_account_id: &str,
        access_token: &str,
    ) -> Result<MetaAdsCampaignPerformance, AppError> {
        let rows = self.platforms.meta_ads_campaigns(ad_account_id, access_token).await?;
        let campaigns = campaign_performance(&rows);

        Ok(MetaAdsCampaignPerformance {
            total_campaigns: campaigns.len(),
            campaigns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn campaign(name: Option<&str>, title: Option<&str>, budget: Option<i64>, status: CampaignStatus) -> Campaign {
        Campaign {
            id: Uuid::new_v4(),
            name: name.map(str::to_owned),
            title: title.map(str::to_owned),
            description: None,
            start_date: None,
            end_date: None,
            budget: budget.map(Decimal::from),
            status,
            platform: None,
            target_audience: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_store_yields_direct_bucket() {
        let stats = build_dashboard(&[], 0, vec![]);

        assert_eq!(stats.total_campaigns, 0);
        assert_eq!(stats.active_campaigns, 0);
        assert_eq!(stats.total_clients, 0);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
        assert!(stats.campaign_performance.is_empty());
        assert_eq!(
            stats.clients_by_source,
            vec![SourceCount {
                source: Some("Direct".to_string()),
                count: 0
            }]
        );
    }

    #[test]
    fn dashboard_sums_budgets_and_counts_active() {
        let mut facebook = campaign(Some("Été"), None, Some(1500), CampaignStatus::Active);
        facebook.platform = Some("facebook".to_string());
        let campaigns = vec![
            facebook,
            campaign(None, Some("Hiver"), None, CampaignStatus::Paused),
            campaign(Some("Printemps"), None, Some(500), CampaignStatus::Active),
        ];
        let by_source = vec![
            SourceCount {
                source: Some("facebook".to_string()),
                count: 3,
            },
            SourceCount { source: None, count: 1 },
        ];

        let stats = build_dashboard(&campaigns, 4, by_source);

        assert_eq!(stats.total_campaigns, 3);
        assert_eq!(stats.active_campaigns, 2);
        assert_eq!(stats.total_revenue, Decimal::from(2000));
        assert_eq!(stats.campaign_performance[0].platform, "facebook");
        assert_eq!(stats.campaign_performance[1].platform, "Unknown");
        assert_eq!(stats.campaign_performance[1].name.as_deref(), Some("Hiver"));
        assert_eq!(stats.campaign_performance[1].budget, Decimal::ZERO);
        assert_eq!(stats.clients_by_source.len(), 2);
    }

    #[test]
    fn url_campaign_id_links_local_campaign_when_uuid() {
        let id = Uuid::new_v4();
        let mut records = vec![NewAnalyticsRecord::default(), NewAnalyticsRecord::default()];

        attach_campaign(&mut records, &id.to_string());
        assert!(records.iter().all(|r| r.campaign_id == Some(id)));

        attach_campaign(&mut records, "23851234");
        assert!(records.iter().all(|r| r.campaign_id.is_none()));
        assert_eq!(records[0].external_campaign_id.as_deref(), Some("23851234"));
    }
}
