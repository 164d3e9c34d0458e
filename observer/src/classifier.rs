//! HTTP client for the external wallet classifier.

use serde_json::json;

use txlens::model::ResultBundle;

use crate::error::ObserverError;

pub struct ClassifierClient {
    base_url: String,
    client: reqwest::Client,
}

impl ClassifierClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Request a classification for the given transaction identifiers.
    ///
    /// One shot, no retries: failures settle the caller's request and are
    /// surfaced for an explicit user re-trigger.
    pub async fn analyze(&self, hashes: &[String]) -> Result<ResultBundle, ObserverError> {
        log::debug!("Requesting classification of {} transactions", hashes.len());

        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .json(&json!({ "hashes": hashes }))
            .send()
            .await
            .map_err(|e| ObserverError::Classifier(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ObserverError::Classifier(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let bundle: ResultBundle = response
            .json()
            .await
            .map_err(|e| ObserverError::Classifier(format!("invalid response: {}", e)))?;

        if !bundle.is_consistent() {
            log::warn!(
                "Classifier bundle inconsistent: {} transactions vs {} attributed",
                bundle.transactions.len(),
                bundle.wallets.total()
            );
        }

        Ok(bundle)
    }
}
