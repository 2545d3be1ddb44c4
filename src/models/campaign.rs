// src/models/campaign.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    // `name` e `title` são sinônimos; o serviço mantém os dois preenchidos
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<Decimal>,
    pub status: CampaignStatus,
    pub platform: Option<String>,
    pub target_audience: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.title.as_deref())
    }
}

// Projeção usada ao "popular" o campaignId de um lead
#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct CampaignSummary {
    pub id: Uuid,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPayload {
    #[schema(example = "Pompage solaire printemps")]
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2026-03-01")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2026-05-31")]
    pub end_date: Option<NaiveDate>,
    #[schema(example = 1500)]
    pub budget: Option<Decimal>,
    pub status: Option<CampaignStatus>,
    #[schema(example = "facebook")]
    pub platform: Option<String>,
    pub target_audience: Option<String>,
}

impl CampaignPayload {
    /// Preenche `name` a partir de `title` (e vice-versa) quando só um veio.
    pub fn sync_name_and_title(&mut self) {
        match (&self.name, &self.title) {
            (Some(name), None) => self.title = Some(name.clone()),
            (None, Some(title)) => self.name = Some(title.clone()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_copied_from_name() {
        let mut payload = CampaignPayload {
            name: Some("Été 2026".into()),
            ..Default::default()
        };
        payload.sync_name_and_title();
        assert_eq!(payload.title.as_deref(), Some("Été 2026"));
    }

    #[test]
    fn name_is_copied_from_title() {
        let mut payload = CampaignPayload {
            title: Some("Raccordement".into()),
            ..Default::default()
        };
        payload.sync_name_and_title();
        assert_eq!(payload.name.as_deref(), Some("Raccordement"));
    }

    #[test]
    fn both_present_are_left_alone() {
        let mut payload = CampaignPayload {
            name: Some("a".into()),
            title: Some("b".into()),
            ..Default::default()
        };
        payload.sync_name_and_title();
        assert_eq!(payload.name.as_deref(), Some("a"));
        assert_eq!(payload.title.as_deref(), Some("b"));
    }
}
