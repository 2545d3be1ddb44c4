// src/services/client_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::ClientRepository,
    models::client::{Client, CreateClientPayload, UpdateClientPayload},
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
}

impl ClientService {
    pub fn new(repo: ClientRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Client>, AppError> {
        self.repo.list_all().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Client, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Client"))
    }

    pub async fn create(&self, payload: CreateClientPayload, created_by: Option<Uuid>) -> Result<Client, AppError> {
        payload.validate()?;
        if payload.name.trim().is_empty() {
            return Err(AppError::BadRequest("client name is required".to_string()));
        }

        let client = self.repo.create(&payload, created_by).await?;
        tracing::info!("Cliente criado: {}", client.id);
        Ok(client)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateClientPayload) -> Result<Client, AppError> {
        payload.validate()?;
        self.repo.update(id, &payload).await?.ok_or(AppError::NotFound("Client"))
    }

    // Leads do cliente não são apagados junto
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Client"));
        }
        tracing::info!("Cliente removido: {}", id);
        Ok(())
    }
}
