//! Error types for the core analysis library.

use thiserror::Error;

use crate::payload::PayloadError;

/// Core error type: payload recognition, bundle validation and export
/// serialization failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("payload rejected: {0}")]
    Payload(#[from] PayloadError),

    #[error("inconsistent result bundle: {0}")]
    InconsistentBundle(String),

    #[error("malformed CSV: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
