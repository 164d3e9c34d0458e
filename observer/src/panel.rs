//! Analysis-panel status state machine.
//!
//! `Idle` → `Ready` once transactions are known, `Ready` → `Requesting` on
//! the user's analyze action (guarding against duplicate concurrent
//! requests), and back to `Ready` or `Error` on settlement. The action is
//! re-enabled unconditionally on settlement so the user can retry; failures
//! are terminal for that attempt, with no automatic retry. Panel visibility
//! is independent of the machine.

use crate::error::ObserverError;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    /// No known transactions; the analyze action is disabled.
    Idle,
    /// Transactions are known; the analyze action is enabled.
    Ready { count: usize },
    /// A classification request is in flight; the action is disabled.
    Requesting,
    /// The last request failed; message surfaced, action re-enabled.
    Error { message: String },
}

#[derive(Debug, Clone)]
pub struct Panel {
    state: PanelState,
    visible: bool,
}

impl Panel {
    pub fn new() -> Self {
        Self {
            state: PanelState::Idle,
            visible: true,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the analyze action is currently enabled.
    pub fn can_analyze(&self) -> bool {
        matches!(
            self.state,
            PanelState::Ready { .. } | PanelState::Error { .. }
        )
    }

    /// Inbound "transactions ready" notification with the current count.
    /// Ignored while a request is in flight; the settled transition wins.
    pub fn on_transactions_ready(&mut self, count: usize) {
        if self.state != PanelState::Requesting {
            self.state = PanelState::Ready { count };
        }
    }

    /// User invoked the analyze action. Refuses while already requesting or
    /// before any transactions are known.
    pub fn begin_request(&mut self) -> Result<(), ObserverError> {
        match self.state {
            PanelState::Ready { .. } | PanelState::Error { .. } => {
                self.state = PanelState::Requesting;
                Ok(())
            }
            PanelState::Requesting => Err(ObserverError::AnalysisInProgress),
            PanelState::Idle => Err(ObserverError::NoTransactions),
        }
    }

    pub fn complete_success(&mut self, count: usize) {
        self.state = PanelState::Ready { count };
    }

    pub fn complete_failure(&mut self, message: impl Into<String>) {
        self.state = PanelState::Error {
            message: message.into(),
        };
    }

    /// Minimize or re-summon the panel. Never touches the state machine.
    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    /// Status line shown in the panel.
    pub fn status_message(&self) -> String {
        match &self.state {
            PanelState::Idle => "Waiting for transactions...".to_string(),
            PanelState::Ready { count } => {
                format!("{} transactions ready for analysis", count)
            }
            PanelState::Requesting => "Analysis in progress...".to_string(),
            PanelState::Error { message } => format!("Analysis failed: {}", message),
        }
    }

    /// The floating panel page: status line, analyze action and the toggle
    /// button that re-summons a minimized panel.
    pub fn render_page(&self) -> String {
        let panel_class = if self.visible {
            "panel"
        } else {
            "panel panel-minimized"
        };
        let analyze_attr = if self.can_analyze() { "" } else { " disabled" };
        let analyze_label = if self.state == PanelState::Requesting {
            "Analysis in progress..."
        } else {
            "Analyze wallet"
        };

        format!(
            concat!(
                "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n",
                "<title>Wallet fingerprint panel</title>\n<style>{style}</style>\n</head>\n<body>\n",
                "<div id=\"fingerprint-panel\" class=\"{panel_class}\">\n",
                "<div class=\"panel-header\"><span class=\"panel-logo\">🔍</span>",
                "<span class=\"panel-title\">Wallet Fingerprint</span>",
                "<form method=\"post\" action=\"/panel/toggle\"><button class=\"panel-close\" title=\"Minimize\">×</button></form>",
                "</div>\n",
                "<div class=\"panel-content\">\n",
                "<div class=\"panel-status\">{status}</div>\n",
                "<form method=\"post\" action=\"/panel/analyze\"><button class=\"panel-analyze\"{analyze_attr}>{analyze_label}</button></form>\n",
                "<a class=\"panel-results\" href=\"/view\">Open analysis view</a>\n",
                "</div>\n</div>\n",
                "<form method=\"post\" action=\"/panel/open\"><button id=\"fingerprint-btn\" title=\"Wallet fingerprint\">🔍</button></form>\n",
                "</body>\n</html>\n"
            ),
            style = PANEL_STYLE,
            panel_class = panel_class,
            status = txlens::render::escape_html(&self.status_message()),
            analyze_attr = analyze_attr,
            analyze_label = analyze_label,
        )
    }
}

const PANEL_STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: transparent; }
.panel { position: fixed; top: 16px; right: 16px; width: 280px; background: #fff; border: 1px solid #e2e8f0; border-radius: 10px; box-shadow: 0 4px 12px rgba(15, 23, 42, 0.12); }
.panel-minimized .panel-content { display: none; }
.panel-header { display: flex; align-items: center; gap: 8px; padding: 10px 12px; border-bottom: 1px solid #e2e8f0; font-weight: 600; }
.panel-header form { margin-left: auto; }
.panel-close { border: none; background: none; font-size: 16px; cursor: pointer; }
.panel-content { padding: 12px; display: flex; flex-direction: column; gap: 10px; }
.panel-status { font-size: 13px; }
.panel-analyze { width: 100%; padding: 8px; border: none; border-radius: 6px; background: #f59e0b; color: #fff; font-weight: 600; cursor: pointer; }
.panel-analyze:disabled { opacity: 0.5; cursor: default; }
.panel-results { font-size: 13px; }
#fingerprint-btn { position: fixed; bottom: 16px; right: 16px; width: 44px; height: 44px; border-radius: 50%; border: none; font-size: 18px; cursor: pointer; box-shadow: 0 4px 12px rgba(15, 23, 42, 0.2); }
"#;

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}
