//! Standalone document snapshot of the rendered view.

use crate::render::{render_document, RenderOptions};
use crate::view::ViewState;

/// Fixed download filename for the document export.
pub const HTML_FILENAME: &str = "analysis.html";

/// Serialize the currently rendered view as a self-contained document.
///
/// The copy carries the full structure of the live view minus the two
/// export-action controls; styles are inlined, so the artifact renders with
/// no dependency on the running service. Filter interactivity is inert in
/// the snapshot.
pub fn export_document(view: &ViewState, opts: &RenderOptions) -> String {
    render_document(view, &opts.for_export())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResultBundle;

    #[test]
    fn test_snapshot_is_standalone_and_stripped() {
        let bundle: ResultBundle = serde_json::from_str(
            r#"{
                "transactions": [{"hash": "aa", "wallet": "Ledger"}],
                "wallets": {"Ledger": 1},
                "errors": []
            }"#,
        )
        .unwrap();
        let view = ViewState::new(bundle, None);
        let html = export_document(&view, &RenderOptions::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("Ledger"));
        assert!(!html.contains("export-csv-btn"));
        assert!(!html.contains("export-html-btn"));
        assert!(!html.contains("<script"));
    }
}
