#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Upstream diagnostic text (the raw completion body, provider/store error
/// detail) is logged here and never echoed to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Completion provider error: {0}")]
    Provider(String),

    #[error("Malformed provider response")]
    MalformedResponse(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Taxonomy violation: {0}")]
    TaxonomyViolation(String),

    #[error("Profile store error: {0}")]
    Store(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            AppError::Provider(msg) => {
                tracing::error!("Completion provider error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROVIDER_ERROR",
                    "The completion provider request failed".to_string(),
                )
            }
            AppError::MalformedResponse(raw) => {
                tracing::error!("Provider returned unparseable output: {raw}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MALFORMED_RESPONSE",
                    "The completion provider returned malformed output".to_string(),
                )
            }
            AppError::SchemaViolation(msg) => {
                (StatusCode::BAD_REQUEST, "SCHEMA_VIOLATION", msg.clone())
            }
            AppError::TaxonomyViolation(msg) => {
                (StatusCode::BAD_REQUEST, "TAXONOMY_VIOLATION", msg.clone())
            }
            AppError::Store(msg) => {
                tracing::error!("Profile store error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "The profile store request failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
