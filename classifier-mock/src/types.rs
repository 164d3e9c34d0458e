/// Classifier API request types
///
/// Response types are the shared wire types from `txlens::model`.

use serde::Deserialize;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub hashes: Vec<String>,
}
