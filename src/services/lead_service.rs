// src/services/lead_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::LeadRepository,
    models::lead::{
        AddInteractionPayload, CreateLeadPayload, Interaction, Lead, LeadStatus,
        UpdateLeadPayload, UpdateLeadStatusPayload,
    },
    services::{
        lead_lifecycle::{check_transition, plan_status_change, plan_update},
        populate::{Populator, Relations},
    },
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    populator: Populator,
}

impl LeadService {
    pub fn new(repo: LeadRepository, populator: Populator) -> Self {
        Self { repo, populator }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list(&self, status: Option<LeadStatus>, relations: Relations) -> Result<Vec<Lead>, AppError> {
        let mut leads: Vec<Lead> = self.repo.list(status).await?.into_iter().map(Lead::from).collect();
        self.populator.leads(&mut leads, relations).await?;
        Ok(leads)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Lead, AppError> {
        let row = self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Lead"))?;
        self.populated(Lead::from(row)).await
    }

    async fn populated(&self, lead: Lead) -> Result<Lead, AppError> {
        let mut leads = [lead];
        self.populator.leads(&mut leads, Relations::ALL).await?;
        let [lead] = leads;
        Ok(lead)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create(&self, payload: CreateLeadPayload, created_by: Option<Uuid>) -> Result<Lead, AppError> {
        payload.validate()?;
        if payload.name.trim().is_empty() {
            return Err(AppError::BadRequest("lead name is required".to_string()));
        }

        let status = payload.status.unwrap_or_default();
        let converted_at = check_transition(status, payload.deal_amount, None, Utc::now())?;
        let deal_amount = payload.deal_amount.unwrap_or(Decimal::ZERO);

        let row = self
            .repo
            .create(&payload, status, deal_amount, converted_at, created_by)
            .await?;

        tracing::info!("Lead criado: {} ({:?})", row.id, row.status);
        Ok(Lead::from(row))
    }

    /// Atualização completa. A regra de conversão só roda quando o patch
    /// mexe em `status` ou `dealAmount`.
    pub async fn update(&self, id: Uuid, payload: UpdateLeadPayload) -> Result<Lead, AppError> {
        payload.validate()?;

        let mut tx = self.repo.pool().begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;

        // Erro aqui derruba a transação sem escrever nada
        let converted_at = plan_update(
            current.status,
            current.converted_at,
            payload.status,
            payload.deal_amount,
            Utc::now(),
        )
        .inspect_err(|_| {
            tracing::warn!("Conversão recusada para o lead {}", id);
        })?;

        let row = self
            .repo
            .update(&mut *tx, id, &payload, converted_at)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;

        tx.commit().await?;

        self.populated(Lead::from(row)).await
    }

    /// Troca só o status (dropdown da tela). Grava status, dealAmount e convertedAt.
    pub async fn update_status(&self, id: Uuid, payload: UpdateLeadStatusPayload) -> Result<Lead, AppError> {
        let mut tx = self.repo.pool().begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;

        let change = plan_status_change(payload.status, payload.deal_amount, current.converted_at, Utc::now())
            .inspect_err(|_| {
                tracing::warn!("Conversão recusada para o lead {}", id);
            })?;

        let row = self
            .repo
            .update_status(&mut *tx, id, change.status, change.deal_amount, change.converted_at)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;

        tx.commit().await?;

        tracing::info!("Lead {} agora está {:?}", id, row.status);
        Ok(Lead::from(row))
    }

    pub async fn add_interaction(&self, id: Uuid, payload: AddInteractionPayload) -> Result<Lead, AppError> {
        let interaction = Interaction {
            kind: payload.kind,
            date: Utc::now(),
            notes: payload.notes,
        };

        let row = self
            .repo
            .append_interaction(id, &interaction)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;

        Ok(Lead::from(row))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Lead"));
        }
        tracing::info!("Lead removido: {}", id);
        Ok(())
    }
}
