// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::serde_ext::empty_string_as_none, models::lead::NeedType};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "client_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Converted,
}

// Campos da planilha antiga de clientes. Ficam num JSONB (`legacy`)
// e aparecem "achatados" no JSON da API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ClientLegacyFields {
    #[serde(
        rename = "N",
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub n: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gouvernorat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub da: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rappel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puissance_ch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subvention: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalites_paiement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact3: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: ClientStatus,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub need_type: Option<NeedType>,
    pub created_by: Option<Uuid>,

    #[sqlx(json)]
    #[serde(flatten)]
    pub legacy: ClientLegacyFields,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "client name is required"))]
    #[schema(example = "Ferme El Amel")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<ClientStatus>,
    pub source: Option<String>,
    pub notes: Option<String>,
    // "besoin" era o nome antigo do campo
    #[serde(alias = "besoin", default, deserialize_with = "empty_string_as_none")]
    pub need_type: Option<NeedType>,
    #[serde(flatten)]
    pub legacy: ClientLegacyFields,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientPayload {
    #[validate(length(min = 1, message = "client name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<ClientStatus>,
    pub source: Option<String>,
    pub notes: Option<String>,
    #[serde(alias = "besoin", default, deserialize_with = "empty_string_as_none")]
    pub need_type: Option<NeedType>,
    #[serde(flatten)]
    pub legacy: ClientLegacyFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_fields_are_read_from_top_level_keys() {
        let payload: CreateClientPayload = serde_json::from_value(json!({
            "name": "Ferme El Amel",
            "besoin": "pompage",
            "gouvernorat": "Sfax",
            "N": 12
        }))
        .unwrap();

        assert_eq!(payload.need_type, Some(NeedType::Pompage));
        assert_eq!(payload.legacy.gouvernorat.as_deref(), Some("Sfax"));
        assert_eq!(payload.legacy.n, Some(12));
    }

    #[test]
    fn blank_form_fields_are_accepted() {
        let payload: CreateClientPayload = serde_json::from_value(json!({
            "name": "Ferme El Amel",
            "email": "",
            "phone": "",
            "status": "",
            "besoin": "",
            "N": "",
            "gouvernorat": "Sfax"
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(payload.email, None);
        assert_eq!(payload.status, None);
        assert_eq!(payload.need_type, None);
        assert_eq!(payload.legacy.n, None);
        assert_eq!(payload.legacy.gouvernorat.as_deref(), Some("Sfax"));
    }
}
