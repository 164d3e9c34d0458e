//! Explicit view state for the presentation engine.
//!
//! Owns the displayed result set and the wallet filter. A fresh
//! [`ViewState`] fully supersedes any prior one; filtering recomputes the
//! visible subset from the in-memory list and never mutates the underlying
//! transactions or errors.

use crate::model::{ErrorRecord, ResultBundle, TransactionRecord, WalletCounts};

/// Base title of the transaction-list card.
pub const LIST_TITLE: &str = "Transaction details";

/// One row of the wallet-share summary.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletShare {
    pub wallet: String,
    pub count: u64,
    /// Share of all attributed transactions, in percent.
    pub percentage: f64,
}

impl WalletShare {
    /// Percentage rounded to one decimal, as rendered.
    pub fn percentage_label(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    cluster: Option<String>,
    all_transactions: Vec<TransactionRecord>,
    all_errors: Vec<ErrorRecord>,
    wallets: WalletCounts,
    selected_wallet: Option<String>,
}

impl ViewState {
    /// Take ownership of a fresh bundle. The wallet filter starts cleared.
    pub fn new(bundle: ResultBundle, cluster: Option<String>) -> Self {
        Self {
            cluster,
            all_transactions: bundle.transactions,
            all_errors: bundle.errors,
            wallets: bundle.wallets,
            selected_wallet: None,
        }
    }

    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.all_transactions
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.all_errors
    }

    pub fn wallets(&self) -> &WalletCounts {
        &self.wallets
    }

    pub fn selected_wallet(&self) -> Option<&str> {
        self.selected_wallet.as_deref()
    }

    /// Wallet shares sorted descending by count. Ties keep the classifier's
    /// emission order (stable sort over insertion order).
    pub fn wallet_shares(&self) -> Vec<WalletShare> {
        let total = self.wallets.total();
        let mut shares: Vec<WalletShare> = self
            .wallets
            .iter()
            .map(|(wallet, count)| WalletShare {
                wallet: wallet.to_string(),
                count,
                percentage: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                },
            })
            .collect();
        shares.sort_by(|a, b| b.count.cmp(&a.count));
        shares
    }

    /// Toggle the wallet filter: selecting the active label clears it.
    pub fn filter_by_wallet(&mut self, wallet: &str) {
        if self.selected_wallet.as_deref() == Some(wallet) {
            self.selected_wallet = None;
        } else {
            self.selected_wallet = Some(wallet.to_string());
        }
    }

    pub fn clear_filter(&mut self) {
        self.selected_wallet = None;
    }

    /// The visible subset: an exact-match filter over the full in-memory
    /// list, computed per call.
    pub fn visible_transactions(&self) -> Vec<&TransactionRecord> {
        match self.selected_wallet.as_deref() {
            Some(wallet) => self
                .all_transactions
                .iter()
                .filter(|tx| tx.wallet == wallet)
                .collect(),
            None => self.all_transactions.iter().collect(),
        }
    }

    /// Title of the list card, reporting either the filtered count with the
    /// label or the unfiltered total.
    pub fn list_title(&self) -> String {
        match self.selected_wallet.as_deref() {
            Some(wallet) => format!(
                "{} - {} ({})",
                LIST_TITLE,
                wallet,
                self.visible_transactions().len()
            ),
            None => format!("{} ({})", LIST_TITLE, self.all_transactions.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(hash: &str, wallet: &str) -> TransactionRecord {
        serde_json::from_value(serde_json::json!({"hash": hash, "wallet": wallet})).unwrap()
    }

    fn sample_view() -> ViewState {
        let bundle = ResultBundle {
            transactions: vec![
                tx("a1", "Electrum"),
                tx("a2", "Electrum"),
                tx("a3", "Bitcoin Core"),
                tx("a4", "Electrum"),
            ],
            wallets: [("Electrum", 3), ("Bitcoin Core", 1)].into_iter().collect(),
            errors: vec![],
        };
        ViewState::new(bundle, Some("cluster-1".to_string()))
    }

    #[test]
    fn test_shares_descending_with_one_decimal() {
        let view = sample_view();
        let shares = view.wallet_shares();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].wallet, "Electrum");
        assert_eq!(shares[0].percentage_label(), "75.0");
        assert_eq!(shares[1].wallet, "Bitcoin Core");
        assert_eq!(shares[1].percentage_label(), "25.0");
    }

    #[test]
    fn test_share_ties_keep_insertion_order() {
        let bundle = ResultBundle {
            transactions: vec![tx("a", "Trezor"), tx("b", "Ledger")],
            wallets: [("Trezor", 1), ("Ledger", 1)].into_iter().collect(),
            errors: vec![],
        };
        let view = ViewState::new(bundle, None);
        let labels: Vec<String> = view.wallet_shares().into_iter().map(|s| s.wallet).collect();
        assert_eq!(labels, vec!["Trezor", "Ledger"]);
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let view = sample_view();
        let sum: f64 = view.wallet_shares().iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 0.2);
    }

    #[test]
    fn test_filter_toggle_roundtrip() {
        let mut view = sample_view();
        assert_eq!(view.visible_transactions().len(), 4);

        view.filter_by_wallet("Bitcoin Core");
        assert_eq!(view.selected_wallet(), Some("Bitcoin Core"));
        assert_eq!(view.visible_transactions().len(), 1);
        assert_eq!(view.list_title(), "Transaction details - Bitcoin Core (1)");

        // Re-applying the same label clears the filter.
        view.filter_by_wallet("Bitcoin Core");
        assert_eq!(view.selected_wallet(), None);
        assert_eq!(view.visible_transactions().len(), 4);
        assert_eq!(view.list_title(), "Transaction details (4)");
    }

    #[test]
    fn test_filter_is_pure_over_inputs() {
        let mut view = sample_view();
        view.filter_by_wallet("Electrum");
        let first: Vec<String> = view
            .visible_transactions()
            .iter()
            .map(|t| t.hash.clone())
            .collect();
        let second: Vec<String> = view
            .visible_transactions()
            .iter()
            .map(|t| t.hash.clone())
            .collect();
        assert_eq!(first, second);
        // Underlying list untouched.
        assert_eq!(view.transactions().len(), 4);
    }

    #[test]
    fn test_switching_filter_labels() {
        let mut view = sample_view();
        view.filter_by_wallet("Electrum");
        view.filter_by_wallet("Bitcoin Core");
        assert_eq!(view.selected_wallet(), Some("Bitcoin Core"));
        assert_eq!(view.visible_transactions().len(), 1);
    }

    #[test]
    fn test_fresh_view_resets_filter() {
        let mut view = sample_view();
        view.filter_by_wallet("Electrum");

        let replacement = ViewState::new(
            ResultBundle {
                transactions: vec![tx("z1", "Trezor")],
                wallets: [("Trezor", 1)].into_iter().collect(),
                errors: vec![],
            },
            None,
        );
        view = replacement;
        assert_eq!(view.selected_wallet(), None);
        assert_eq!(view.visible_transactions().len(), 1);
    }
}
