// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::campaign::CampaignStatus;

// 1. Os cards do topo + gráficos do painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_clients: i64,
    pub total_revenue: Decimal, // Soma dos orçamentos das campanhas
    pub campaign_performance: Vec<CampaignPerformanceEntry>,
    pub clients_by_source: Vec<SourceCount>,
}

// 2. Uma barra do gráfico de campanhas
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct CampaignPerformanceEntry {
    pub name: Option<String>,
    pub budget: Decimal,
    pub status: CampaignStatus,
    pub platform: String,
}

// 3. Pizza de clientes por origem
#[derive(Debug, Serialize, FromRow, ToSchema, PartialEq)]
pub struct SourceCount {
    pub source: Option<String>,
    pub count: i64,
}
