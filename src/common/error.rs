// src/common/error.rs

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda falha vira um corpo `{ "message": ... }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras de negócio e entradas malformadas (400)
    #[error("{0}")]
    BadRequest(String),

    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    // Falha de uma API externa (Meta / Google): o corpo original vai em `details`
    #[error("Upstream error: {message}")]
    Upstream { message: String, details: Option<Value> },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// A URL carrega o access_token da Graph API: nunca vai para log nem resposta
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream {
            message: e.without_url().to_string(),
            details: None,
        }
    }
}

// Rejeições dos extratores do axum viram 400 com o nosso formato
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Conflito de e-mail é reportado como 400, igual ao cliente web espera
            AppError::EmailAlreadyExists => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Junta as mensagens do `validator` numa frase só: "name: required; leadScore: ...".
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::ValidationError(ref errors) => json!({ "message": validation_message(errors) }),
            AppError::BadRequest(ref message) => json!({ "message": message }),
            AppError::EmailAlreadyExists => json!({ "message": "A user with this email already exists" }),
            AppError::InvalidCredentials => json!({ "message": "Invalid email or password" }),
            AppError::InvalidToken => json!({ "message": "Missing or invalid authentication token" }),
            AppError::Forbidden => json!({ "message": "Access denied: role not authorized" }),
            AppError::NotFound(entity) => json!({ "message": format!("{} not found", entity) }),
            AppError::Upstream { ref message, ref details } => {
                tracing::error!("Falha na API externa: {} {:?}", message, details);
                json!({ "message": message, "details": details })
            }
            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                json!({ "message": "An unexpected error occurred" })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn conflict_is_reported_as_bad_request() {
        let response = AppError::EmailAlreadyExists.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "A user with this email already exists");
    }

    #[tokio::test]
    async fn not_found_names_the_entity() {
        let response = AppError::NotFound("Lead").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Lead not found");
    }

    #[tokio::test]
    async fn transport_errors_do_not_leak_the_access_token() {
        // Porta 1 local: conexão recusada sem sair da máquina
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/v18.0/act_1/insights?access_token=segredo-da-graph")
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await
            .unwrap_err();

        let app_error = AppError::from(err);
        assert!(!app_error.to_string().contains("segredo-da-graph"));

        let body = body_json(app_error.into_response()).await;
        assert!(!body["message"].as_str().unwrap().contains("segredo-da-graph"));
    }

    #[tokio::test]
    async fn upstream_errors_keep_details() {
        let response = AppError::Upstream {
            message: "Meta request failed".into(),
            details: Some(json!({ "error": { "code": 190 } })),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Meta request failed");
        assert_eq!(body["details"]["error"]["code"], 190);
    }

    #[tokio::test]
    async fn internal_errors_hide_the_cause() {
        let response = AppError::InternalServerError(anyhow::anyhow!("pool closed")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "An unexpected error occurred");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "required"))]
        name: String,
    }

    #[test]
    fn validation_message_lists_fields() {
        let errors = Sample { name: String::new() }.validate().unwrap_err();
        assert_eq!(validation_message(&errors), "name: required");
        assert_eq!(AppError::from(errors).status_code(), StatusCode::BAD_REQUEST);
    }
}
