//! Error types for oagg-svc HTTP handlers

use crate::engine::EnrichError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Enrichment could not resolve the order (404 / 502)
    #[error(transparent)]
    Enrich(#[from] EnrichError),
}

/// Result alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Enrich(EnrichError::RootNotFound(_)) => {
                (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND")
            }
            ApiError::Enrich(EnrichError::RootLookup { .. }) => {
                (StatusCode::BAD_GATEWAY, "ORDER_LOOKUP_FAILED")
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
