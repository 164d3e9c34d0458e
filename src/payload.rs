//! Recognition of intercepted transfer payloads.
//!
//! The observation tap sees every upstream response; only bodies that are a
//! non-empty JSON array whose first element carries a string `hash` field,
//! served from a path containing the transfer marker, count as transaction
//! data. Everything else is rejected with a typed reason so the tap can drop
//! it silently.

use serde_json::Value;
use thiserror::Error;

/// Default request-path substring marking transfer responses.
pub const TRANSFER_PATH_MARKER: &str = "/transfers";

/// Why a response body was not treated as transaction data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("request path does not contain the transfer marker")]
    PathMismatch,

    #[error("response body is not valid JSON: {0}")]
    NotJson(String),

    #[error("payload is not a JSON array")]
    NotAnArray,

    #[error("payload array is empty")]
    EmptyBatch,

    #[error("first element carries no transaction identifier")]
    MissingHash,
}

/// A recognized transfer payload: the identifiers it carries plus the raw
/// records, kept opaque for downstream consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferBatch {
    pub hashes: Vec<String>,
    pub records: Value,
    /// Cluster the host page was inspecting, when derivable from the path.
    pub cluster: Option<String>,
}

impl TransferBatch {
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Decide whether an observed response is transaction data.
///
/// Recognition is presence-based: the first element must carry a string
/// `hash`. Identifier format is not validated here; unusual hashes surface
/// later as per-item classifier errors.
pub fn recognize(path: &str, marker: &str, body: &[u8]) -> Result<TransferBatch, PayloadError> {
    if !path.contains(marker) {
        return Err(PayloadError::PathMismatch);
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| PayloadError::NotJson(e.to_string()))?;

    let records = match value {
        Value::Array(items) => items,
        _ => return Err(PayloadError::NotAnArray),
    };

    let first = records.first().ok_or(PayloadError::EmptyBatch)?;
    if !first.get("hash").map_or(false, Value::is_string) {
        return Err(PayloadError::MissingHash);
    }

    let hashes = records
        .iter()
        .filter_map(|r| r.get("hash").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    Ok(TransferBatch {
        hashes,
        cluster: cluster_from_path(path, marker),
        records: Value::Array(records),
    })
}

/// Extract the cluster identifier from an observed request path: the segment
/// immediately preceding the transfer-marker segment, e.g.
/// `/api/clusters/<cluster>/transfers`.
pub fn cluster_from_path(path: &str, marker: &str) -> Option<String> {
    let marker_segment = marker.trim_matches('/');
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let at = segments.iter().position(|s| *s == marker_segment)?;
    if at == 0 {
        return None;
    }
    Some(segments[at - 1].to_string())
}
