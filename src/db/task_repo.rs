// src/db/task_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::task::{CreateTaskPayload, TaskRow, UpdateTaskPayload},
};

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Mais recentes primeiro
    pub async fn list_all(&self) -> Result<Vec<TaskRow>, AppError> {
        let tasks = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskRow>, AppError> {
        let task = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    pub async fn create(&self, payload: &CreateTaskPayload, created_by: Uuid) -> Result<TaskRow, AppError> {
        let task = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (title, description, kind, priority, due_date, assigned_to, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.kind.unwrap_or_default())
        .bind(payload.priority.unwrap_or_default())
        .bind(payload.due_date)
        .bind(payload.assigned_to)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateTaskPayload) -> Result<Option<TaskRow>, AppError> {
        let task = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                kind = COALESCE($4, kind),
                priority = COALESCE($5, priority),
                due_date = COALESCE($6, due_date),
                assigned_to = COALESCE($7, assigned_to),
                status = COALESCE($8, status),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.kind)
        .bind(payload.priority)
        .bind(payload.due_date)
        .bind(payload.assigned_to)
        .bind(payload.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
