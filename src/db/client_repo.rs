// src/db/client_repo.rs

use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        client::{Client, CreateClientPayload, UpdateClientPayload},
        dashboard::SourceCount,
    },
};

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(clients)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    pub async fn create(
        &self,
        payload: &CreateClientPayload,
        created_by: Option<Uuid>,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (
                name, email, phone, company, status, source, notes,
                need_type, created_by, legacy
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.company)
        .bind(payload.status.unwrap_or_default())
        .bind(&payload.source)
        .bind(&payload.notes)
        .bind(payload.need_type)
        .bind(created_by)
        .bind(Json(&payload.legacy))
        .fetch_one(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateClientPayload) -> Result<Option<Client>, AppError> {
        // `legacy || $10` sobrepõe só as chaves enviadas (as ausentes nem são serializadas)
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                status = COALESCE($6, status),
                source = COALESCE($7, source),
                notes = COALESCE($8, notes),
                need_type = COALESCE($9, need_type),
                legacy = legacy || $10,
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
        .bind(payload.status)
        .bind(&payload.source)
        .bind(&payload.notes)
        .bind(payload.need_type)
        .bind(Json(&payload.legacy))
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_source(&self) -> Result<Vec<SourceCount>, AppError> {
        let groups = sqlx::query_as::<_, SourceCount>(
            r#"
            SELECT source, COUNT(*) AS count
            FROM clients
            GROUP BY source
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(groups)
    }
}
