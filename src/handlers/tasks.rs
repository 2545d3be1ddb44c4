// src/handlers/tasks.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath},
    },
    config::AppState,
    handlers::MessageResponse,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CanManageTasks, RequireCapability},
    },
    models::task::{CreateTaskPayload, Task, UpdateTaskPayload},
};

// GET /api/tasks
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    responses((status = 200, description = "Tarefas, mais recentes primeiro", body = Vec<Task>)),
    security(("api_jwt" = []))
)]
pub async fn list_tasks(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageTasks>,
) -> Result<AppJson<Vec<Task>>, AppError> {
    Ok(AppJson(app_state.task_service.list().await?))
}

// GET /api/tasks/{id}
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 200, description = "Tarefa", body = Task),
        (status = 404, description = "Tarefa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_task(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageTasks>,
    AppPath(id): AppPath<Uuid>,
) -> Result<AppJson<Task>, AppError> {
    Ok(AppJson(app_state.task_service.get_by_id(id).await?))
}

// POST /api/tasks
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskPayload,
    responses(
        (status = 201, description = "Tarefa criada", body = Task),
        (status = 400, description = "Título ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_task(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageTasks>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(payload): AppJson<CreateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    let task = app_state.task_service.create(payload, claims.id).await?;
    Ok((StatusCode::CREATED, AppJson(task)))
}

// PUT /api/tasks/{id}
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    request_body = UpdateTaskPayload,
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 200, description = "Tarefa atualizada", body = Task),
        (status = 404, description = "Tarefa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_task(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageTasks>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateTaskPayload>,
) -> Result<AppJson<Task>, AppError> {
    Ok(AppJson(app_state.task_service.update(id, payload).await?))
}

// DELETE /api/tasks/{id}
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 200, description = "Tarefa removida", body = MessageResponse),
        (status = 404, description = "Tarefa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_task(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageTasks>,
    AppPath(id): AppPath<Uuid>,
) -> Result<AppJson<MessageResponse>, AppError> {
    app_state.task_service.delete(id).await?;
    Ok(AppJson(MessageResponse::new("Task deleted")))
}
