// src/db/analytics_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::analytics::{AnalyticsRecord, MetaStats, NewAnalyticsRecord},
};

// Postgres aceita no máximo 65535 parâmetros por instrução
const INSERT_COLUMNS: usize = 12;
const INSERT_CHUNK_ROWS: usize = u16::MAX as usize / INSERT_COLUMNS;

#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_one(&self, record: &NewAnalyticsRecord) -> Result<AnalyticsRecord, AppError> {
        let saved = sqlx::query_as::<_, AnalyticsRecord>(
            r#"
            INSERT INTO analytics (
                campaign_id, external_campaign_id, source, clicks, impressions,
                cost, conversions, reach, frequency, cpc, cpm, date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(record.campaign_id)
        .bind(&record.external_campaign_id)
        .bind(&record.source)
        .bind(record.clicks)
        .bind(record.impressions)
        .bind(record.cost)
        .bind(record.conversions)
        .bind(record.reach)
        .bind(record.frequency)
        .bind(record.cpc)
        .bind(record.cpm)
        .bind(record.date)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    /// Insere o lote em blocos, dentro de uma transação: ou entra tudo, ou nada.
    pub async fn insert_many(&self, records: &[NewAnalyticsRecord]) -> Result<u64, AppError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for chunk in records.chunks(INSERT_CHUNK_ROWS) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO analytics (campaign_id, external_campaign_id, source, clicks, impressions, \
                 cost, conversions, reach, frequency, cpc, cpm, date) ",
            );

            builder.push_values(chunk, |mut row, record| {
                row.push_bind(record.campaign_id)
                    .push_bind(&record.external_campaign_id)
                    .push_bind(&record.source)
                    .push_bind(record.clicks)
                    .push_bind(record.impressions)
                    .push_bind(record.cost)
                    .push_bind(record.conversions)
                    .push_bind(record.reach)
                    .push_bind(record.frequency)
                    .push_bind(record.cpc)
                    .push_bind(record.cpm)
                    .push_bind(record.date);
            });

            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    pub async fn find_by_campaign(&self, campaign_id: Uuid) -> Result<Vec<AnalyticsRecord>, AppError> {
        let records = sqlx::query_as::<_, AnalyticsRecord>(
            "SELECT * FROM analytics WHERE campaign_id = $1 ORDER BY date DESC",
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn find_by_external_campaign(&self, external_id: &str) -> Result<Vec<AnalyticsRecord>, AppError> {
        let records = sqlx::query_as::<_, AnalyticsRecord>(
            "SELECT * FROM analytics WHERE external_campaign_id = $1 ORDER BY date DESC",
        )
        .bind(external_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Totais e médias de uma origem. Tabela vazia devolve zeros.
    pub async fn summarize_source(&self, source: &str) -> Result<MetaStats, AppError> {
        let stats = sqlx::query_as::<_, MetaStats>(
            r#"
            SELECT
                COALESCE(SUM(clicks), 0)::BIGINT AS total_clicks,
                COALESCE(SUM(impressions), 0)::BIGINT AS total_impressions,
                COALESCE(SUM(cost), 0) AS total_spend,
                COALESCE(SUM(conversions), 0)::BIGINT AS total_conversions,
                COALESCE(AVG(cpc), 0) AS avg_cpc,
                COALESCE(AVG(cpm), 0) AS avg_cpm,
                COALESCE(SUM(reach), 0)::BIGINT AS total_reach
            FROM analytics
            WHERE source = $1
            "#,
        )
        .bind(source)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_chunk_fits_the_bind_limit() {
        assert!(INSERT_COLUMNS * INSERT_CHUNK_ROWS <= u16::MAX as usize);
        // 6000 linhas excederiam o limite numa instrução só
        assert!(6000usize.div_ceil(INSERT_CHUNK_ROWS) > 1);
    }
}
