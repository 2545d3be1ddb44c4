// src/handlers/users.rs

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
        rbac::{CanManageUsers, CanViewDashboard, RequireCapability},
    },
    models::auth::{CreateUserPayload, UpdateProfilePayload, UpdateUserPayload, User},
};

// =============================================================================
//  ADMINISTRAÇÃO (somente admin)
// =============================================================================

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Todos os usuários", body = Vec<User>),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageUsers>,
) -> Result<AppJson<Vec<User>>, AppError> {
    let users = app_state.user_service.list().await?;
    Ok(AppJson(users))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 400, description = "Dados inválidos ou email já usado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageUsers>,
    AppJson(payload): AppJson<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, AppJson(user)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageUsers>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateUserPayload>,
) -> Result<AppJson<User>, AppError> {
    let user = app_state.user_service.update(id, payload).await?;
    Ok(AppJson(user))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário removido", body = MessageResponse),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    _: RequireCapability<CanManageUsers>,
    AppPath(id): AppPath<Uuid>,
) -> Result<AppJson<MessageResponse>, AppError> {
    app_state.user_service.delete(id).await?;
    Ok(AppJson(MessageResponse::new("User deleted")))
}

// =============================================================================
//  PERFIL E LISTAGENS AUXILIARES
// =============================================================================

// PUT /api/users/profile/me
#[utoipa::path(
    put,
    path = "/api/users/profile/me",
    tag = "Users",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = User),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(payload): AppJson<UpdateProfilePayload>,
) -> Result<AppJson<User>, AppError> {
    let user = app_state.user_service.update_profile(claims.id, payload).await?;
    Ok(AppJson(user))
}

// GET /api/users/commercials
#[utoipa::path(
    get,
    path = "/api/users/commercials",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários com papel commercial", body = Vec<User>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_commercials(
    State(app_state): State<AppState>,
    _: RequireCapability<CanViewDashboard>,
) -> Result<AppJson<Vec<User>>, AppError> {
    let users = app_state.user_service.list_commercials().await?;
    Ok(AppJson(users))
}
