// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dmphq_core::{RecommendationError, ValidationError};
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Recommendation not found: {0}")]
    RecommendationNotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<RecommendationError> for ApiError {
    fn from(err: RecommendationError) -> Self {
        match err {
            RecommendationError::NotFound { id } => ApiError::RecommendationNotFound(id),
            conflict @ RecommendationError::ConflictingUpdate { .. } => {
                ApiError::BadRequest(conflict.to_string())
            }
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::TenantNotFound(_) | ApiError::RecommendationNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = match &self {
            ApiError::TenantNotFound(id) => {
                tracing::warn!(tenant_id = %id, "Tenant not found");
                ErrorResponse::with_details("Tenant not found", format!("Tenant ID: {}", id))
            }
            ApiError::RecommendationNotFound(id) => {
                tracing::warn!(recommendation_id = %id, "Recommendation not found");
                ErrorResponse::with_details(
                    "Recommendation not found",
                    format!("Recommendation ID: {}", id),
                )
            }
            ApiError::Validation(err) => {
                tracing::warn!(error = %err, "Invalid input");
                ErrorResponse::with_details("Invalid input", err.to_string())
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                ErrorResponse::with_details("Bad request", msg.clone())
            }
        };

        (self.status(), Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
