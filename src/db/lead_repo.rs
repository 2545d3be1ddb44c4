// src/db/lead_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{CreateLeadPayload, Interaction, LeadRow, LeadStatus, UpdateLeadPayload},
};

// `jsonb || jsonb[]` concatena no fim: a nova interação vai como array de um elemento
fn history_tail(interaction: &Interaction) -> Json<&[Interaction]> {
    Json(std::slice::from_ref(interaction))
}

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    /// Lista todos os leads, opcionalmente filtrando por status.
    pub async fn list(&self, status: Option<LeadStatus>) -> Result<Vec<LeadRow>, AppError> {
        let leads = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT * FROM leads
            WHERE ($1::lead_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(leads)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LeadRow>, AppError> {
        let lead = sqlx::query_as::<_, LeadRow>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lead)
    }

    /// Busca e trava a linha até o fim da transação.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<LeadRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, LeadRow>("SELECT * FROM leads WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(lead)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create(
        &self,
        payload: &CreateLeadPayload,
        status: LeadStatus,
        deal_amount: Decimal,
        converted_at: Option<DateTime<Utc>>,
        created_by: Option<Uuid>,
    ) -> Result<LeadRow, AppError> {
        let lead = sqlx::query_as::<_, LeadRow>(
            r#"
            INSERT INTO leads (
                name, email, phone, company, source, notes, status, lead_score,
                next_follow_up_date, assigned_to, commercial, created_by, campaign_id,
                power_kw, need_type, deal_amount, converted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.company)
        .bind(&payload.source)
        .bind(&payload.notes)
        .bind(status)
        .bind(payload.lead_score.unwrap_or(0))
        .bind(payload.next_follow_up_date)
        .bind(payload.assigned_to)
        .bind(payload.commercial.as_deref().map(str::trim))
        .bind(created_by)
        .bind(payload.campaign_id)
        .bind(payload.power_kw)
        .bind(payload.need_type)
        .bind(deal_amount)
        .bind(converted_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(lead)
    }

    /// Atualização completa (PUT). `converted_at` já vem decidido pelo validador.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateLeadPayload,
        converted_at: Option<DateTime<Utc>>,
    ) -> Result<Option<LeadRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, LeadRow>(
            r#"
            UPDATE leads SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                source = COALESCE($6, source),
                notes = COALESCE($7, notes),
                status = COALESCE($8, status),
                lead_score = COALESCE($9, lead_score),
                next_follow_up_date = COALESCE($10, next_follow_up_date),
                assigned_to = COALESCE($11, assigned_to),
                commercial = COALESCE($12, commercial),
                campaign_id = COALESCE($13, campaign_id),
                power_kw = COALESCE($14, power_kw),
                need_type = COALESCE($15, need_type),
                deal_amount = COALESCE($16, deal_amount),
                converted_at = $17,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.company)
        .bind(&payload.source)
        .bind(&payload.notes)
        .bind(payload.status)
        .bind(payload.lead_score)
        .bind(payload.next_follow_up_date)
        .bind(payload.assigned_to)
        .bind(payload.commercial.as_deref().map(str::trim))
        .bind(payload.campaign_id)
        .bind(payload.power_kw)
        .bind(payload.need_type)
        .bind(payload.deal_amount)
        .bind(converted_at)
        .fetch_optional(executor)
        .await?;
        Ok(lead)
    }

    /// Transição de status: grava só status, deal_amount e converted_at.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: LeadStatus,
        deal_amount: Option<Decimal>,
        converted_at: Option<DateTime<Utc>>,
    ) -> Result<Option<LeadRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, LeadRow>(
            r#"
            UPDATE leads SET
                status = $2,
                deal_amount = COALESCE($3, deal_amount),
                converted_at = $4,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(deal_amount)
        .bind(converted_at)
        .fetch_optional(executor)
        .await?;
        Ok(lead)
    }

    /// Acrescenta uma interação no fim do histórico, numa única instrução.
    pub async fn append_interaction(
        &self,
        id: Uuid,
        interaction: &Interaction,
    ) -> Result<Option<LeadRow>, AppError> {
        let lead = sqlx::query_as::<_, LeadRow>(
            r#"
            UPDATE leads SET
                interactions = interactions || $2,
                last_contact_date = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(history_tail(interaction))
        .bind(interaction.date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lead)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn interaction(kind: &str, day: u32) -> Interaction {
        Interaction {
            kind: Some(kind.to_string()),
            date: Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn appended_interaction_is_a_single_element_array() {
        let call = interaction("call", 2);
        let tail = serde_json::to_value(history_tail(&call).0).unwrap();

        assert!(tail.is_array());
        assert_eq!(tail.as_array().unwrap().len(), 1);
        assert_eq!(tail[0]["type"], "call");
    }

    #[test]
    fn history_keeps_insertion_order() {
        // Mesma semântica do `||` do Postgres para arrays
        let mut history = serde_json::to_value(vec![interaction("email", 1)]).unwrap();
        for next in [interaction("call", 2), interaction("meeting", 3)] {
            let tail = serde_json::to_value(history_tail(&next).0).unwrap();
            history.as_array_mut().unwrap().extend(tail.as_array().unwrap().iter().cloned());
        }

        let kinds: Vec<&str> = history.as_array().unwrap().iter().map(|i| i["type"].as_str().unwrap()).collect();
        assert_eq!(kinds, ["email", "call", "meeting"]);
    }
}
