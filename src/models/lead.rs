// src/models/lead.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::serde_ext::empty_string_as_none;
use crate::models::{
    auth::UserSummary,
    campaign::CampaignSummary,
    reference::Reference,
};

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_status do banco
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

/// Tipo de instalação solar pedida. Compartilhado entre Lead e Client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "need_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NeedType {
    Pompage,
    Raccordement,
}

// --- HISTÓRICO ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

// --- LEAD ---

// Linha crua da tabela `leads`
#[derive(Debug, Clone, FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: LeadStatus,
    pub lead_score: i32,
    pub last_contact_date: Option<DateTime<Utc>>,
    pub next_follow_up_date: Option<NaiveDate>,
    pub assigned_to: Option<Uuid>,
    pub commercial: Option<String>,
    pub created_by: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub power_kw: Option<f64>,
    pub need_type: Option<NeedType>,
    #[sqlx(json)]
    pub interactions: Vec<Interaction>,
    pub deal_amount: Decimal,
    pub converted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O que a API devolve. Referências podem vir "populadas".
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: LeadStatus,
    pub lead_score: i32,
    pub last_contact_date: Option<DateTime<Utc>>,
    pub next_follow_up_date: Option<NaiveDate>,

    #[schema(value_type = Option<Object>)]
    pub assigned_to: Option<Reference<UserSummary>>,
    pub commercial: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub created_by: Option<Reference<UserSummary>>,
    #[schema(value_type = Option<Object>)]
    pub campaign_id: Option<Reference<CampaignSummary>>,

    #[serde(rename = "powerKW")]
    pub power_kw: Option<f64>,
    pub need_type: Option<NeedType>,
    pub interactions: Vec<Interaction>,
    pub deal_amount: Decimal,
    pub converted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            source: row.source,
            notes: row.notes,
            status: row.status,
            lead_score: row.lead_score,
            last_contact_date: row.last_contact_date,
            next_follow_up_date: row.next_follow_up_date,
            assigned_to: row.assigned_to.map(Reference::Id),
            commercial: row.commercial,
            created_by: row.created_by.map(Reference::Id),
            campaign_id: row.campaign_id.map(Reference::Id),
            power_kw: row.power_kw,
            need_type: row.need_type,
            interactions: row.interactions,
            deal_amount: row.deal_amount,
            converted_at: row.converted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// --- PAYLOADS ---

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "lead name is required"))]
    #[schema(example = "Acme")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<LeadStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(range(min = 0, max = 100, message = "must be between 0 and 100"))]
    pub lead_score: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub next_follow_up_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub assigned_to: Option<Uuid>,
    pub commercial: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub campaign_id: Option<Uuid>,
    #[serde(rename = "powerKW", default, deserialize_with = "empty_string_as_none")]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub power_kw: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub need_type: Option<NeedType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(example = 0)]
    pub deal_amount: Option<Decimal>,
}

// Atualização parcial: campos ausentes mantêm o valor salvo
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    #[validate(length(min = 1, message = "lead name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<LeadStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(range(min = 0, max = 100, message = "must be between 0 and 100"))]
    pub lead_score: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub next_follow_up_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub assigned_to: Option<Uuid>,
    pub commercial: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub campaign_id: Option<Uuid>,
    #[serde(rename = "powerKW", default, deserialize_with = "empty_string_as_none")]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub power_kw: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub need_type: Option<NeedType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub deal_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadStatusPayload {
    #[schema(example = "converted")]
    pub status: LeadStatus,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(example = 500)]
    pub deal_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddInteractionPayload {
    #[serde(rename = "type")]
    #[schema(example = "call")]
    pub kind: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeadStatusFilter {
    pub status: Option<LeadStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Corpo como o formulário de leads envia, com campos em branco
    fn blank_form() -> serde_json::Value {
        json!({
            "name": "Acme",
            "email": "",
            "phone": "",
            "company": "",
            "source": "website",
            "notes": "",
            "status": "new",
            "commercial": "",
            "campaignId": "",
            "assignedTo": "",
            "nextFollowUpDate": "",
            "needType": "",
            "powerKW": "",
            "dealAmount": ""
        })
    }

    #[test]
    fn blank_form_fields_are_accepted_on_create() {
        let payload: CreateLeadPayload = serde_json::from_value(blank_form()).unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.email, None);
        assert_eq!(payload.need_type, None);
        assert_eq!(payload.power_kw, None);
        assert_eq!(payload.campaign_id, None);
        assert_eq!(payload.deal_amount, None);
        assert_eq!(payload.status, Some(LeadStatus::New));
    }

    #[test]
    fn blank_form_fields_are_accepted_on_update() {
        let payload: UpdateLeadPayload = serde_json::from_value(blank_form()).unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.need_type, None);
        assert_eq!(payload.next_follow_up_date, None);
    }

    #[test]
    fn filled_form_fields_keep_their_values() {
        let payload: CreateLeadPayload = serde_json::from_value(json!({
            "name": "Acme",
            "email": "contato@acme.tn",
            "needType": "pompage",
            "powerKW": "7.5",
            "dealAmount": 1200
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(payload.need_type, Some(NeedType::Pompage));
        assert_eq!(payload.power_kw, Some(7.5));
        assert_eq!(payload.deal_amount, Some(Decimal::from(1200)));
    }

    #[test]
    fn filled_but_invalid_email_is_still_rejected() {
        let payload: CreateLeadPayload =
            serde_json::from_value(json!({ "name": "Acme", "email": "nao-e-email" })).unwrap();
        assert!(payload.validate().is_err());
    }
}
