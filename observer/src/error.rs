use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("classifier request failed: {0}")]
    Classifier(String),

    #[error("no transactions intercepted yet")]
    NoTransactions,

    #[error("no analysis data available")]
    NoAnalysis,

    #[error("analysis already in progress")]
    AnalysisInProgress,

    #[error("export failed: {0}")]
    Export(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ObserverError::Upstream(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            ObserverError::Classifier(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            ObserverError::NoTransactions => (StatusCode::BAD_REQUEST, self.to_string()),
            ObserverError::NoAnalysis => (StatusCode::NOT_FOUND, self.to_string()),
            ObserverError::AnalysisInProgress => (StatusCode::CONFLICT, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
