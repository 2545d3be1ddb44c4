// src/handlers.rs

use serde::Serialize;
use utoipa::ToSchema;

pub mod analytics;
pub mod auth;
pub mod campaigns;
pub mod clients;
pub mod leads;
pub mod meta_ads;
pub mod tasks;
pub mod users;

// Resposta das rotas de remoção
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
