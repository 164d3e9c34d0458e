//! End-to-end exercise of the core pipeline: payload recognition → view
//! construction → summary/filter → exports.

use txlens::export;
use txlens::model::ResultBundle;
use txlens::payload;
use txlens::render::{self, RenderOptions};
use txlens::view::ViewState;

fn bundle_from_json(json: &str) -> ResultBundle {
    serde_json::from_str(json).expect("bundle JSON")
}

#[test]
fn test_recognized_payload_feeds_the_pipeline() {
    // A transfer response streams past the tap...
    let body = br#"[
        {"hash": "aa01", "amount": 1.0},
        {"hash": "bb02", "amount": 2.0}
    ]"#;
    let batch = payload::recognize(
        "/api/clusters/cl-77/transfers",
        payload::TRANSFER_PATH_MARKER,
        body,
    )
    .expect("payload recognized");
    assert_eq!(batch.hashes, vec!["aa01", "bb02"]);
    assert_eq!(batch.cluster.as_deref(), Some("cl-77"));

    // ...the classifier answers for those identifiers...
    let bundle = bundle_from_json(
        r#"{
            "transactions": [
                {"hash": "aa01", "wallet": "Electrum", "reasoning": ["Signals RBF"]},
                {"hash": "bb02", "wallet": "Electrum", "reasoning": ["Anti-fee-sniping"]}
            ],
            "wallets": {"Electrum": 2},
            "errors": []
        }"#,
    );
    assert!(bundle.is_consistent());

    // ...and the view renders under the originating cluster.
    let view = ViewState::new(bundle, batch.cluster);
    let html = render::render_document(&view, &RenderOptions::default());
    assert!(html.contains("cl-77"));
    assert!(html.contains("Electrum"));
}

#[test]
fn test_summary_and_filter_scenario() {
    // Four transactions, two labels: Electrum at 75.0%, Bitcoin Core at 25.0%.
    let bundle = bundle_from_json(
        r#"{
            "transactions": [
                {"hash": "a1", "wallet": "Electrum"},
                {"hash": "a2", "wallet": "Electrum"},
                {"hash": "a3", "wallet": "Electrum"},
                {"hash": "b1", "wallet": "Bitcoin Core"}
            ],
            "wallets": {"Electrum": 3, "Bitcoin Core": 1},
            "errors": []
        }"#,
    );
    let mut view = ViewState::new(bundle, None);

    let shares = view.wallet_shares();
    assert_eq!(shares[0].wallet, "Electrum");
    assert_eq!(shares[0].percentage_label(), "75.0");
    assert_eq!(shares[1].wallet, "Bitcoin Core");
    assert_eq!(shares[1].percentage_label(), "25.0");

    // Clicking Bitcoin Core narrows the list to one transaction.
    view.filter_by_wallet("Bitcoin Core");
    assert_eq!(view.visible_transactions().len(), 1);
    assert_eq!(view.list_title(), "Transaction details - Bitcoin Core (1)");

    let fragment = render::render_list_fragment(&view, &RenderOptions::default());
    assert!(fragment.contains("Transaction details - Bitcoin Core (1)"));
    assert!(fragment.contains("b1"));
    assert!(!fragment.contains("a1"));

    // The CSV export follows the visible view.
    let csv = export::export_csv(&view).expect("csv export");
    let rows = export::csv::parse(&csv).expect("csv parse");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "b1");
    assert_eq!(rows[1][1], "Bitcoin Core");

    // Toggling back restores the full set, and the document export carries
    // the whole view without the export controls.
    view.filter_by_wallet("Bitcoin Core");
    assert_eq!(view.visible_transactions().len(), 4);

    let doc = export::export_document(&view, &RenderOptions::default());
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("a1"));
    assert!(!doc.contains("export-csv-btn"));
}

#[test]
fn test_csv_round_trip_over_awkward_values() {
    let bundle = bundle_from_json(
        r#"{
            "transactions": [
                {
                    "hash": "ff00",
                    "wallet": "Wallet, \"quoted\"",
                    "vin": [{"address": "bc1q, with comma", "value": 0.1, "type": "v0_p2wpkh"}],
                    "vout": [],
                    "fee": 0.0001,
                    "reasoning": ["line\nbreak tag", "Signals RBF"]
                }
            ],
            "wallets": {"Wallet, \"quoted\"": 1},
            "errors": []
        }"#,
    );
    let view = ViewState::new(bundle, None);

    let csv = export::export_csv(&view).expect("csv export");
    let rows = export::csv::parse(&csv).expect("csv parse");

    assert_eq!(rows[1][1], "Wallet, \"quoted\"");
    assert_eq!(rows[1][7], "line\nbreak tag; Signals RBF");
    assert_eq!(
        rows[1][5],
        r#"[{"address":"bc1q, with comma","value":0.1,"type":"v0_p2wpkh"}]"#
    );
}
