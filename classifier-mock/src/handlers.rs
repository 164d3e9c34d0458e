/// Axum HTTP handlers for the mock classifier endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use txlens::model::ResultBundle;

use crate::engine;
use crate::types::AnalyzeRequest;

/// Custom error type for handlers
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// POST /analyze
/// Classifies the submitted transaction identifiers
pub async fn analyze(Json(req): Json<AnalyzeRequest>) -> Result<Json<ResultBundle>, ApiError> {
    if req.hashes.is_empty() {
        return Err(ApiError::BadRequest("No hashes supplied".to_string()));
    }

    log::info!("Classifying {} transactions", req.hashes.len());
    let bundle = engine::classify_batch(&req.hashes);
    log::info!(
        "Classified {} transactions ({} errors)",
        bundle.transactions.len(),
        bundle.errors.len()
    );

    Ok(Json(bundle))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
