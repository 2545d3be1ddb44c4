// src/services/campaign_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::CampaignRepository,
    models::campaign::{Campaign, CampaignPayload},
};

#[derive(Clone)]
pub struct CampaignService {
    repo: CampaignRepository,
}

fn check_payload(payload: &CampaignPayload) -> Result<(), AppError> {
    payload.validate()?;
    if payload.budget.is_some_and(|b| b < Decimal::ZERO) {
        return Err(AppError::BadRequest("budget must not be negative".to_string()));
    }
    check_date_order(payload.start_date, payload.end_date)
}

fn check_date_order(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(AppError::BadRequest("endDate must not be before startDate".to_string()));
        }
    }
    Ok(())
}

// Atualização parcial: a data que não veio no payload é a que já está salva
fn check_merged_dates(payload: &CampaignPayload, stored: &Campaign) -> Result<(), AppError> {
    check_date_order(
        payload.start_date.or(stored.start_date),
        payload.end_date.or(stored.end_date),
    )
}

impl CampaignService {
    pub fn new(repo: CampaignRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Campaign>, AppError> {
        self.repo.list_all().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Campaign, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Campaign"))
    }

    pub async fn create(&self, mut payload: CampaignPayload) -> Result<Campaign, AppError> {
        check_payload(&payload)?;
        payload.sync_name_and_title();

        let campaign = self.repo.create(&payload).await?;
        tracing::info!("Campanha criada: {} {:?}", campaign.id, campaign.display_name());
        Ok(campaign)
    }

    pub async fn update(&self, id: Uuid, mut payload: CampaignPayload) -> Result<Campaign, AppError> {
        check_payload(&payload)?;
        let stored = self.get_by_id(id).await?;
        check_merged_dates(&payload, &stored)?;
        payload.sync_name_and_title();

        self.repo.update(id, &payload).await?.ok_or(AppError::NotFound("Campaign"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Campaign"));
        }
        tracing::info!("Campanha removida: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_budget_is_rejected() {
        let payload = CampaignPayload {
            budget: Some(Decimal::from(-10)),
            ..Default::default()
        };
        assert!(matches!(check_payload(&payload), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let payload = CampaignPayload {
            start_date: NaiveDate::from_ymd_opt(2026, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 1),
            ..Default::default()
        };
        assert!(check_payload(&payload).is_err());
    }

    fn stored_campaign(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Campaign {
        Campaign {
            id: Uuid::new_v4(),
            name: Some("Pompage solaire".into()),
            title: Some("Pompage solaire".into()),
            description: None,
            start_date: start,
            end_date: end,
            budget: None,
            status: Default::default(),
            platform: None,
            target_audience: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn partial_update_is_checked_against_stored_dates() {
        let stored = stored_campaign(NaiveDate::from_ymd_opt(2026, 5, 1), NaiveDate::from_ymd_opt(2026, 6, 1));

        let only_end = CampaignPayload {
            end_date: NaiveDate::from_ymd_opt(2026, 4, 1),
            ..Default::default()
        };
        assert!(matches!(check_merged_dates(&only_end, &stored), Err(AppError::BadRequest(_))));

        let only_start = CampaignPayload {
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1),
            ..Default::default()
        };
        assert!(check_merged_dates(&only_start, &stored).is_err());

        let both_moved = CampaignPayload {
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 1),
            ..Default::default()
        };
        assert!(check_merged_dates(&both_moved, &stored).is_ok());
    }

    #[test]
    fn partial_update_without_stored_dates_is_accepted() {
        let stored = stored_campaign(None, None);
        let only_end = CampaignPayload {
            end_date: NaiveDate::from_ymd_opt(2026, 4, 1),
            ..Default::default()
        };
        assert!(check_merged_dates(&only_end, &stored).is_ok());
    }

    #[test]
    fn empty_payload_is_accepted() {
        assert!(check_payload(&CampaignPayload::default()).is_ok());
    }
}
