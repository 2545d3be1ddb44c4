// src/services/user_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CreateUserPayload, Role, UpdateProfilePayload, UpdateUserPayload, User},
    services::auth::hash_password,
};

// Senha só é trocada quando veio preenchida
async fn optional_hash(password: Option<&str>) -> Result<Option<String>, AppError> {
    match password {
        Some(p) if !p.trim().is_empty() => Ok(Some(hash_password(p).await?)),
        _ => Ok(None),
    }
}

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.repo.list_all().await
    }

    pub async fn list_commercials(&self) -> Result<Vec<User>, AppError> {
        self.repo.list_by_role(Role::Commercial).await
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        payload.validate()?;

        if self.repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed = hash_password(&payload.password).await?;
        let user = self
            .repo
            .create_user(payload.name.trim(), &payload.email, &hashed, payload.role)
            .await?;

        tracing::info!("Usuário criado pelo admin: {} ({:?})", user.email, user.role);
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateUserPayload) -> Result<User, AppError> {
        payload.validate()?;
        let hashed = optional_hash(payload.password.as_deref()).await?;

        self.repo
            .update_user(
                id,
                payload.name.as_deref(),
                payload.email.as_deref(),
                hashed.as_deref(),
                payload.role,
            )
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    /// O próprio usuário: nome, e-mail e senha. O cargo não muda aqui.
    pub async fn update_profile(&self, id: Uuid, payload: UpdateProfilePayload) -> Result<User, AppError> {
        payload.validate()?;
        let hashed = optional_hash(payload.password.as_deref()).await?;

        self.repo
            .update_user(
                id,
                payload.name.as_deref(),
                payload.email.as_deref(),
                hashed.as_deref(),
                None,
            )
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_user(id).await? {
            return Err(AppError::NotFound("User"));
        }
        tracing::info!("Usuário removido: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_password_is_not_rehashed() {
        assert_eq!(optional_hash(None).await.unwrap(), None);
        assert_eq!(optional_hash(Some("   ")).await.unwrap(), None);
        assert!(optional_hash(Some("nova-senha")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn password_is_hashed_exactly_as_typed() {
        let hashed = optional_hash(Some("  minha senha ")).await.unwrap().unwrap();
        assert!(bcrypt::verify("  minha senha ", &hashed).unwrap());
        assert!(!bcrypt::verify("minha senha", &hashed).unwrap());
    }
}
