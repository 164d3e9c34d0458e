//! HTML rendering of the analysis view.
//!
//! All output is a pure function of the [`ViewState`] and the render
//! options: re-rendering the same view yields byte-identical markup. Block
//! times come from the records themselves; no wall-clock reads happen here.

use crate::evidence;
use crate::format::{format_address, format_block_time, format_btc};
use crate::view::ViewState;

/// Inline SVG icons for the two result cards.
const ICON_CHART: &str = r#"<svg viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path d="M3 3v18h18" stroke="currentColor" stroke-width="2" fill="none"/><path d="M7 14l4-4 4 4 5-6" stroke="currentColor" stroke-width="2" fill="none"/></svg>"#;
const ICON_LIST: &str = r#"<svg viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path d="M8 6h13M8 12h13M8 18h13M3 6h.01M3 12h.01M3 18h.01" stroke="currentColor" stroke-width="2" fill="none" stroke-linecap="round"/></svg>"#;

/// Fixed UI strings. String tables are an external collaborator; the core
/// renders English.
const TITLE_SUMMARY: &str = "Wallet summary";
const TITLE_ERRORS: &str = "Errors";
const TITLE_PAGE: &str = "Wallet fingerprint analysis";
const LABEL_ANALYZED: &str = "Transactions analyzed";
const LABEL_NO_DATA: &str = "No analysis data available";
const LABEL_NO_DATA_HINT: &str = "Browse a cluster in the observed application, then run the analysis from the panel.";

const ERROR_HASH_PREFIX_LEN: usize = 24;
const IO_PREVIEW_ROWS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// How the markup will be used.
///
/// `Export` produces the standalone snapshot: export-action controls are
/// stripped and filter targets degrade to inert anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Live,
    Export,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Block-explorer base URL; transaction links append `/<hash>`.
    pub explorer_url: String,
    pub theme: Theme,
    pub mode: RenderMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            explorer_url: "https://mempool.space/tx".to_string(),
            theme: Theme::Light,
            mode: RenderMode::Live,
        }
    }
}

impl RenderOptions {
    /// The same options with the mode switched to `Export`.
    pub fn for_export(&self) -> Self {
        Self {
            mode: RenderMode::Export,
            ..self.clone()
        }
    }
}

/// Escape text for HTML element and attribute context.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a query-string value.
fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Glyph shown next to a wallet label in the summary.
fn wallet_icon(wallet: &str) -> &'static str {
    match wallet {
        "Bitcoin Core" => "🟠",
        "Electrum" => "⚡",
        "Blue Wallet" => "🔵",
        "Coinbase Wallet" => "🔷",
        "Exodus Wallet" => "🟣",
        "Trust Wallet" => "🛡️",
        "Trezor" => "🔒",
        "Ledger" => "📟",
        "Unclear" => "❓",
        "Other" => "❔",
        _ => "💼",
    }
}

/// Full standalone analysis document.
pub fn render_document(view: &ViewState, opts: &RenderOptions) -> String {
    let body_class = match opts.theme {
        Theme::Light => "",
        Theme::Dark => " class=\"dark\"",
    };

    let export_controls = match opts.mode {
        RenderMode::Live => concat!(
            r#"<div class="export-actions">"#,
            r#"<a id="export-csv-btn" class="export-btn" href="/export/analysis.csv">Export CSV</a>"#,
            r#"<a id="export-html-btn" class="export-btn" href="/export/analysis.html">Export HTML</a>"#,
            "</div>"
        )
        .to_string(),
        RenderMode::Export => String::new(),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{style}</style>\n</head>\n<body{body_class}>\n<header class=\"topbar\"><h1>{title}</h1>{export_controls}</header>\n{cluster}\n<div id=\"content\">\n<div class=\"results-grid\">\n{summary}\n{transactions}\n</div>\n</div>\n</body>\n</html>\n",
        title = TITLE_PAGE,
        style = STYLESHEET,
        body_class = body_class,
        export_controls = export_controls,
        cluster = render_cluster_info(view),
        summary = render_summary_card(view, opts),
        transactions = render_transactions_card(view, opts),
    )
}

/// Terminal error panel for a view opened without its data bundle.
pub fn render_error_page(message: &str, opts: &RenderOptions) -> String {
    let body_class = match opts.theme {
        Theme::Light => "",
        Theme::Dark => " class=\"dark\"",
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{style}</style>\n</head>\n<body{body_class}>\n<div id=\"content\">\n<div class=\"error-message\">\n<p class=\"error-title\">{headline}</p>\n<p class=\"error-hint\">{message}</p>\n</div>\n</div>\n</body>\n</html>\n",
        title = TITLE_PAGE,
        style = STYLESHEET,
        body_class = body_class,
        headline = LABEL_NO_DATA,
        message = escape_html(if message.is_empty() {
            LABEL_NO_DATA_HINT
        } else {
            message
        }),
    )
}

fn render_cluster_info(view: &ViewState) -> String {
    format!(
        concat!(
            r#"<div id="cluster-info">"#,
            r#"<span id="cluster-address">{cluster}</span>"#,
            r#"<span class="stat">Transactions: <b id="tx-count">{txs}</b></span>"#,
            r#"<span class="stat">Wallets: <b id="wallet-count">{wallets}</b></span>"#,
            r#"<span class="stat">Errors: <b id="error-count">{errors}</b></span>"#,
            "</div>"
        ),
        cluster = escape_html(view.cluster().unwrap_or("Unknown cluster")),
        txs = view.transactions().len(),
        wallets = view.wallets().len(),
        errors = view.errors().len(),
    )
}

fn render_summary_card(view: &ViewState, opts: &RenderOptions) -> String {
    let mut rows = String::new();
    for share in view.wallet_shares() {
        let active = view.selected_wallet() == Some(share.wallet.as_str());
        let class = if active {
            "wallet-item wallet-item-active"
        } else {
            "wallet-item"
        };
        let percentage = share.percentage_label();
        let inner = format!(
            concat!(
                r#"<span class="wallet-name">{icon} {wallet}</span>"#,
                r#"<span class="wallet-percentage">{percentage}%</span>"#,
                r#"<div class="wallet-bar" style="width: {percentage}%"></div>"#
            ),
            icon = wallet_icon(&share.wallet),
            wallet = escape_html(&share.wallet),
            percentage = percentage,
        );
        match opts.mode {
            RenderMode::Live => rows.push_str(&format!(
                "<a class=\"{class}\" data-wallet=\"{wallet}\" data-count=\"{count}\" href=\"/view/filter?wallet={query}\">{inner}</a>\n",
                class = class,
                wallet = escape_html(&share.wallet),
                count = share.count,
                query = encode_query(&share.wallet),
                inner = inner,
            )),
            RenderMode::Export => rows.push_str(&format!(
                "<div class=\"{class}\" data-wallet=\"{wallet}\" data-count=\"{count}\">{inner}</div>\n",
                class = class,
                wallet = escape_html(&share.wallet),
                count = share.count,
                inner = inner,
            )),
        }
    }

    format!(
        concat!(
            r#"<div class="card">"#,
            r#"<div class="card-header"><span class="card-icon">{icon}</span><span class="card-title">{title}</span></div>"#,
            r#"<div class="card-body"><div class="wallet-list">"#,
            "{rows}",
            "</div>",
            r#"<p class="summary-total">{analyzed}: {total}</p>"#,
            "</div></div>"
        ),
        icon = ICON_CHART,
        title = TITLE_SUMMARY,
        rows = rows,
        analyzed = LABEL_ANALYZED,
        total = view.wallets().total(),
    )
}

fn render_transactions_card(view: &ViewState, opts: &RenderOptions) -> String {
    format!(
        concat!(
            r#"<div class="card transactions-card">"#,
            r#"<div class="card-header"><span class="card-icon">{icon}</span><span class="card-title" id="tx-title">{title}</span></div>"#,
            r#"<div class="card-body" id="tx-list-container">"#,
            "{list}",
            "</div></div>"
        ),
        icon = ICON_LIST,
        title = escape_html(&view.list_title()),
        list = render_transaction_list(view, opts),
    )
}

/// The transaction-list region and its title, for in-place updates after a
/// filter toggle.
pub fn render_list_fragment(view: &ViewState, opts: &RenderOptions) -> String {
    format!(
        concat!(
            r#"<span class="card-title" id="tx-title">{title}</span>"#,
            "\n",
            r#"<div class="card-body" id="tx-list-container">"#,
            "{list}",
            "</div>"
        ),
        title = escape_html(&view.list_title()),
        list = render_transaction_list(view, opts),
    )
}

/// The visible transactions followed by the error list.
pub fn render_transaction_list(view: &ViewState, opts: &RenderOptions) -> String {
    let mut out = String::new();

    for tx in view.visible_transactions() {
        let vin = &tx.vin;
        let vout = &tx.vout;

        out.push_str("<div class=\"tx-item\">\n<div class=\"tx-header\">\n");
        out.push_str(&format!(
            "<a href=\"{explorer}/{hash}\" target=\"_blank\" class=\"tx-hash\">{hash}</a>\n",
            explorer = escape_html(&opts.explorer_url),
            hash = escape_html(&tx.hash),
        ));
        out.push_str(&format!(
            "<span class=\"tx-wallet\">{}</span>\n</div>\n",
            escape_html(&tx.wallet)
        ));

        out.push_str("<div class=\"tx-meta\">\n");
        out.push_str(&format!(
            "<span class=\"meta-badge\">Inputs: {}</span>",
            vin.len()
        ));
        out.push_str(&format!(
            "<span class=\"meta-badge\">Outputs: {}</span>",
            vout.len()
        ));
        out.push_str(&format!(
            "<span class=\"meta-badge\">Out: {} BTC</span>",
            format_btc(Some(tx.resolved_total_output()))
        ));
        out.push_str(&format!(
            "<span class=\"meta-badge\">Fee: {} BTC</span>",
            format_btc(tx.fee)
        ));
        if let Some(vsize) = tx.vsize {
            out.push_str(&format!("<span class=\"meta-badge\">vsize: {}</span>", vsize));
        }
        if let Some(block_time) = tx.block_time {
            out.push_str(&format!(
                "<span class=\"meta-badge\">{}</span>",
                format_block_time(block_time)
            ));
        }
        out.push_str("\n</div>\n");

        out.push_str("<div class=\"tx-io\">\n");
        out.push_str(&render_io_column("Inputs", vin.iter().map(|i| (i.address.as_deref(), i.value))));
        out.push_str(&render_io_column("Outputs", vout.iter().map(|o| (o.address.as_deref(), o.value))));
        out.push_str("</div>\n");

        out.push_str("<div class=\"tx-features\">\n");
        for tag in &tx.reasoning {
            let class = evidence::classify(tag).css_class();
            if class.is_empty() {
                out.push_str(&format!(
                    "<span class=\"feature-tag\">{}</span>\n",
                    escape_html(tag)
                ));
            } else {
                out.push_str(&format!(
                    "<span class=\"feature-tag {}\">{}</span>\n",
                    class,
                    escape_html(tag)
                ));
            }
        }
        out.push_str("</div>\n</div>\n");
    }

    let errors = view.errors();
    if !errors.is_empty() {
        out.push_str(&format!(
            "<div class=\"error-section\">\n<div class=\"error-section-title\">{} ({})</div>\n",
            TITLE_ERRORS,
            errors.len()
        ));
        for err in errors {
            let prefix: String = err.hash.chars().take(ERROR_HASH_PREFIX_LEN).collect();
            out.push_str(&format!(
                "<div class=\"tx-item tx-item-error\"><span class=\"tx-hash error-hash\">{}...</span><span class=\"error-text\">{}</span></div>\n",
                escape_html(&prefix),
                escape_html(&err.error),
            ));
        }
        out.push_str("</div>\n");
    }

    out
}

fn render_io_column<'a>(
    title: &str,
    rows: impl ExactSizeIterator<Item = (Option<&'a str>, Option<f64>)>,
) -> String {
    let total = rows.len();
    let mut out = format!(
        "<div class=\"tx-io-col\">\n<div class=\"tx-io-title\">{}</div>\n<div class=\"tx-io-list\">\n",
        title
    );
    for (address, value) in rows.take(IO_PREVIEW_ROWS) {
        out.push_str(&format!(
            "<div class=\"tx-io-row\"><span class=\"tx-io-addr\" title=\"{full}\">{short}</span><span class=\"tx-io-val\">{value} BTC</span></div>\n",
            full = escape_html(address.unwrap_or("")),
            short = escape_html(&format_address(address)),
            value = format_btc(value),
        ));
    }
    if total > IO_PREVIEW_ROWS {
        out.push_str(&format!(
            "<div class=\"tx-io-more\">+{} more</div>\n",
            total - IO_PREVIEW_ROWS
        ));
    }
    out.push_str("</div>\n</div>\n");
    out
}

/// Inline stylesheet keeping exported documents self-contained.
const STYLESHEET: &str = r#"
:root { --border-color: #e2e8f0; --bg: #f8fafc; --fg: #0f172a; --card-bg: #ffffff; --accent: #f59e0b; }
body.dark { --border-color: #334155; --bg: #0f172a; --fg: #e2e8f0; --card-bg: #1e293b; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--fg); }
.topbar { display: flex; align-items: center; justify-content: space-between; padding: 12px 20px; border-bottom: 1px solid var(--border-color); }
.topbar h1 { font-size: 18px; margin: 0; }
.export-actions { display: flex; gap: 8px; }
.export-btn { font-size: 13px; padding: 6px 12px; border: 1px solid var(--border-color); border-radius: 6px; text-decoration: none; color: inherit; }
#cluster-info { display: flex; gap: 16px; padding: 10px 20px; font-size: 13px; border-bottom: 1px solid var(--border-color); }
#cluster-address { font-family: monospace; }
.results-grid { display: grid; grid-template-columns: 320px 1fr; gap: 16px; padding: 16px 20px; }
.card { background: var(--card-bg); border: 1px solid var(--border-color); border-radius: 10px; overflow: hidden; }
.card-header { display: flex; align-items: center; gap: 8px; padding: 12px 16px; border-bottom: 1px solid var(--border-color); font-weight: 600; }
.card-icon svg { width: 18px; height: 18px; }
.card-body { padding: 12px 16px; }
.wallet-list { display: flex; flex-direction: column; gap: 6px; }
.wallet-item { position: relative; display: flex; justify-content: space-between; padding: 8px 10px; border-radius: 6px; text-decoration: none; color: inherit; }
.wallet-item-active { outline: 2px solid var(--accent); }
.wallet-bar { position: absolute; left: 0; bottom: 0; height: 3px; background: var(--accent); border-radius: 2px; }
.summary-total { font-size: 13px; opacity: 0.8; }
.tx-item { border: 1px solid var(--border-color); border-radius: 8px; padding: 10px 12px; margin-bottom: 10px; }
.tx-item-error { background: rgba(239, 68, 68, 0.08); display: flex; gap: 12px; }
.tx-header { display: flex; justify-content: space-between; gap: 12px; }
.tx-hash { font-family: monospace; font-size: 12px; word-break: break-all; }
.tx-wallet { font-size: 12px; font-weight: 600; white-space: nowrap; }
.tx-meta { display: flex; flex-wrap: wrap; gap: 6px; margin: 8px 0; }
.meta-badge { font-size: 11px; padding: 2px 8px; border: 1px solid var(--border-color); border-radius: 10px; }
.tx-io { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
.tx-io-title { font-size: 11px; font-weight: 600; text-transform: uppercase; opacity: 0.7; }
.tx-io-row { display: flex; justify-content: space-between; font-size: 12px; font-family: monospace; }
.tx-io-more { font-size: 11px; opacity: 0.7; }
.tx-features { display: flex; flex-wrap: wrap; gap: 6px; margin-top: 8px; }
.feature-tag { font-size: 11px; padding: 2px 8px; border-radius: 10px; border: 1px solid var(--border-color); }
.feature-tag.positive { border-color: #16a34a; color: #16a34a; }
.feature-tag.negative { border-color: #dc2626; color: #dc2626; }
.error-section { margin-top: 24px; padding-top: 24px; border-top: 1px solid var(--border-color); }
.error-section-title { font-size: 14px; font-weight: 600; color: #dc2626; margin-bottom: 14px; }
.error-hash, .error-text { color: #dc2626; font-size: 13px; }
.error-message { margin: 60px auto; max-width: 420px; text-align: center; }
.error-title { font-weight: 600; margin-bottom: 10px; }
.error-hint { opacity: 0.8; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResultBundle;

    fn view_from_json(json: &str) -> ViewState {
        let bundle: ResultBundle = serde_json::from_str(json).unwrap();
        ViewState::new(bundle, Some("cluster-9".to_string()))
    }

    fn sample_view() -> ViewState {
        view_from_json(
            r#"{
                "transactions": [
                    {
                        "hash": "deadbeef00",
                        "wallet": "Electrum",
                        "vin": [
                            {"address": "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq", "value": 1.0, "type": "v0_p2wpkh"},
                            {"address": "1short", "value": 0.5},
                            {"value": 0.25},
                            {"address": "addr4", "value": 0.25},
                            {"address": "addr5", "value": 0.25}
                        ],
                        "vout": [{"address": "1short", "value": 1.5}],
                        "fee": 0.001,
                        "vsize": 200,
                        "blockTime": 1700000000,
                        "reasoning": ["Signals RBF", "Does not signal RBF", "Mystery tag"]
                    }
                ],
                "wallets": {"Electrum": 1},
                "errors": [{"hash": "feedfacefeedfacefeedfacefeedface", "error": "Transaction not found"}]
            }"#,
        )
    }

    #[test]
    fn test_render_is_deterministic() {
        let view = sample_view();
        let opts = RenderOptions::default();
        assert_eq!(render_document(&view, &opts), render_document(&view, &opts));
    }

    #[test]
    fn test_document_structure() {
        let view = sample_view();
        let html = render_document(&view, &RenderOptions::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("cluster-9"));
        assert!(html.contains("Electrum"));
        assert!(html.contains("100.0%"));
        assert!(html.contains("https://mempool.space/tx/deadbeef00"));
        assert!(html.contains("export-csv-btn"));
        assert!(html.contains("export-html-btn"));
    }

    #[test]
    fn test_export_mode_strips_export_controls() {
        let view = sample_view();
        let html = render_document(&view, &RenderOptions::default().for_export());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("export-csv-btn"));
        assert!(!html.contains("export-html-btn"));
        // The view content itself is intact.
        assert!(html.contains("Electrum"));
        assert!(!html.contains("/view/filter?wallet="));
    }

    #[test]
    fn test_io_overflow_counter() {
        let view = sample_view();
        let html = render_transaction_list(&view, &RenderOptions::default());
        assert!(html.contains("+1 more"));
        // Fifth input address never rendered verbatim.
        assert!(!html.contains("addr5"));
        assert!(html.contains("addr4"));
    }

    #[test]
    fn test_reasoning_tag_classes() {
        let view = sample_view();
        let html = render_transaction_list(&view, &RenderOptions::default());
        assert!(html.contains(r#"<span class="feature-tag positive">Signals RBF</span>"#));
        assert!(html.contains(r#"<span class="feature-tag negative">Does not signal RBF</span>"#));
        assert!(html.contains(r#"<span class="feature-tag">Mystery tag</span>"#));
    }

    #[test]
    fn test_missing_value_renders_placeholder_not_zero() {
        let view = view_from_json(
            r#"{
                "transactions": [
                    {"hash": "aa", "wallet": "Other", "vin": [{"address": "x"}], "vout": []}
                ],
                "wallets": {"Other": 1},
                "errors": []
            }"#,
        );
        let html = render_transaction_list(&view, &RenderOptions::default());
        // Missing fee and input value render the placeholder.
        assert!(html.contains("Fee: - BTC"));
        assert!(html.contains("<span class=\"tx-io-val\">- BTC</span>"));
    }

    #[test]
    fn test_errors_render_truncated_after_transactions() {
        let view = sample_view();
        let html = render_transaction_list(&view, &RenderOptions::default());
        let error_pos = html.find("feedfacefeedfacefeedface...").expect("error row");
        let tx_pos = html.find("deadbeef00").expect("tx row");
        assert!(tx_pos < error_pos);
        assert!(html.contains("Transaction not found"));
    }

    #[test]
    fn test_filter_fragment_title() {
        let mut view = sample_view();
        view.filter_by_wallet("Electrum");
        let fragment = render_list_fragment(&view, &RenderOptions::default());
        assert!(fragment.contains("Transaction details - Electrum (1)"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b a="1">&'"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_error_page_has_no_retry_affordance() {
        let html = render_error_page("", &RenderOptions::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("No analysis data available"));
        assert!(!html.contains("export-csv-btn"));
    }
}
