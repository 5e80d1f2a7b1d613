//! Error types for the registration API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use registration_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message returned for every authentication failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Access denied. Invalid or missing token.";

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected submission fields; carries the joined violation messages
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid registration ID")]
    InvalidId,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{msg}", msg = UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    /// Backend fault; only `message` reaches the client
    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// Map a store failure, using `message` as the public text for faults.
    pub fn from_store(error: StoreError, message: &'static str) -> Self {
        match error {
            StoreError::Validation(e) => ApiError::Validation(e.to_string()),
            StoreError::InvalidId(_) => ApiError::InvalidId,
            other => ApiError::Internal {
                message,
                detail: other.to_string(),
            },
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { message, detail } => {
                error!(%detail, "{}", message);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            success: false,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
