// src/common/extract.rs

// Versões dos extratores do axum que rejeitam com AppError,
// assim corpo inválido, UUID inválido e query inválida respondem `{ "message" }`.

use axum::extract::{FromRequest, FromRequestParts};
use serde::Serialize;
use axum::response::{IntoResponse, Response};

use crate::common::error::AppError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
