// src/db/campaign_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::campaign::{Campaign, CampaignPayload, CampaignSummary},
};

#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Campaign>, AppError> {
        let campaigns = sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(campaigns)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(campaign)
    }

    pub async fn find_summaries(&self, ids: &[Uuid]) -> Result<Vec<CampaignSummary>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let summaries = sqlx::query_as::<_, CampaignSummary>(
            "SELECT id, COALESCE(name, title) AS name FROM campaigns WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    pub async fn create(&self, payload: &CampaignPayload) -> Result<Campaign, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (
                name, title, description, start_date, end_date,
                budget, status, platform, target_audience
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.budget)
        .bind(payload.status.unwrap_or_default())
        .bind(&payload.platform)
        .bind(&payload.target_audience)
        .fetch_one(&self.pool)
        .await?;
        Ok(campaign)
    }

    pub async fn update(&self, id: Uuid, payload: &CampaignPayload) -> Result<Option<Campaign>, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns SET
                name = COALESCE($2, name),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                budget = COALESCE($7, budget),
                status = COALESCE($8, status),
                platform = COALESCE($9, platform),
                target_audience = COALESCE($10, target_audience),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.budget)
        .bind(payload.status)
        .bind(&payload.platform)
        .bind(&payload.target_audience)
        .fetch_optional(&self.pool)
        .await?;
        Ok(campaign)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
