use serde::{Deserialize, Serialize};
use serde_json::Value;

use txlens::model::ResultBundle;

use crate::panel::{Panel, PanelState};
use crate::session::StoredAnalysis;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub hashes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub hashes: Vec<String>,
    pub transfers: Value,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub results: ResultBundle,
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfers: Option<Value>,
}

impl From<StoredAnalysis> for AnalysisResponse {
    fn from(stored: StoredAnalysis) -> Self {
        Self {
            results: stored.results,
            cluster: stored.cluster,
            transfers: Some(stored.transfers),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PanelStatusResponse {
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub visible: bool,
    pub analyze_enabled: bool,
}

impl PanelStatusResponse {
    pub fn from_panel(panel: &Panel) -> Self {
        let (state, count, message) = match panel.state() {
            PanelState::Idle => ("idle", None, None),
            PanelState::Ready { count } => ("ready", Some(*count), None),
            PanelState::Requesting => ("requesting", None, None),
            PanelState::Error { message } => ("error", None, Some(message.clone())),
        };
        Self {
            state: state.to_string(),
            count,
            message,
            visible: panel.is_visible(),
            analyze_enabled: panel.can_analyze(),
        }
    }
}
