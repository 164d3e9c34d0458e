//! Wire types shared with the external wallet classifier.
//!
//! Field names match the classifier's camelCase JSON so bundles can be
//! decoded and re-emitted transparently.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One side of a transaction: a consumed or produced coin.
///
/// Address and value may be absent for non-standard scripts; the script type
/// is an opaque classifier-defined string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub script_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub script_type: Option<String>,
}

/// A classified transaction as returned by the wallet classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub wallet: String,
    #[serde(default)]
    pub vin: Vec<TxInput>,
    #[serde(default)]
    pub vout: Vec<TxOutput>,
    #[serde(
        rename = "totalInput",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_input: Option<f64>,
    #[serde(
        rename = "totalOutput",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_output: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    #[serde(rename = "blockTime", default, skip_serializing_if = "Option::is_none")]
    pub block_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vsize: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    /// Evidence tags in application order. Never sorted.
    #[serde(default)]
    pub reasoning: Vec<String>,
}

impl TransactionRecord {
    /// Total output amount: the classifier-supplied figure, or the sum of
    /// output values when it was omitted.
    pub fn resolved_total_output(&self) -> f64 {
        self.total_output
            .unwrap_or_else(|| self.vout.iter().filter_map(|o| o.value).sum())
    }
}

/// A transaction the classifier could not analyze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub hash: String,
    pub error: String,
}

/// Per-wallet attribution counts, preserving the classifier's emission order.
///
/// Serialized as a JSON object. A plain map would reorder labels on decode;
/// tie-breaking in the summary relies on insertion order, so entries are kept
/// in a vector and deserialized through a map visitor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletCounts(Vec<(String, u64)>);

impl WalletCounts {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set the count for a label, keeping its first-insertion position.
    pub fn insert(&mut self, label: impl Into<String>, count: u64) {
        let label = label.into();
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = count,
            None => self.0.push((label, count)),
        }
    }

    /// Add one to a label's count, creating it at the back if new.
    pub fn increment(&mut self, label: &str) {
        match self.0.iter_mut().find(|(l, _)| l == label) {
            Some(entry) => entry.1 += 1,
            None => self.0.push((label.to_string(), 1)),
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(l, c)| (l.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, c)| c).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for WalletCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = WalletCounts::new();
        for (label, count) in iter {
            counts.insert(label, count);
        }
        counts
    }
}

impl Serialize for WalletCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WalletCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = WalletCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of wallet labels to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut counts = WalletCounts::new();
                while let Some((label, count)) = access.next_entry::<String, u64>()? {
                    counts.insert(label, count);
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// Aggregate output of one classification run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub wallets: WalletCounts,
    #[serde(default)]
    pub errors: Vec<ErrorRecord>,
}

impl ResultBundle {
    /// Every transaction contributes exactly one count to exactly one label.
    pub fn is_consistent(&self) -> bool {
        self.wallets.total() as usize == self.transactions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_counts_preserve_insertion_order() {
        let json = r#"{"Electrum": 3, "Bitcoin Core": 3, "Trezor": 1}"#;
        let counts: WalletCounts = serde_json::from_str(json).unwrap();

        let labels: Vec<&str> = counts.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Electrum", "Bitcoin Core", "Trezor"]);
        assert_eq!(counts.total(), 7);

        // Round-trips in the same order.
        let out = serde_json::to_string(&counts).unwrap();
        assert_eq!(out, r#"{"Electrum":3,"Bitcoin Core":3,"Trezor":1}"#);
    }

    #[test]
    fn test_resolved_total_output_falls_back_to_vout_sum() {
        let tx = TransactionRecord {
            hash: "ab".repeat(32),
            wallet: "Electrum".to_string(),
            vin: vec![],
            vout: vec![
                TxOutput {
                    address: None,
                    value: Some(0.5),
                    script_type: None,
                },
                TxOutput {
                    address: None,
                    value: Some(0.25),
                    script_type: None,
                },
                TxOutput {
                    address: None,
                    value: None,
                    script_type: None,
                },
            ],
            total_input: None,
            total_output: None,
            fee: None,
            block_time: None,
            vsize: None,
            weight: None,
            reasoning: vec![],
        };

        assert_eq!(tx.resolved_total_output(), 0.75);
    }

    #[test]
    fn test_bundle_consistency() {
        let bundle: ResultBundle = serde_json::from_str(
            r#"{
                "transactions": [
                    {"hash": "aa", "wallet": "Electrum"},
                    {"hash": "bb", "wallet": "Electrum"}
                ],
                "wallets": {"Electrum": 2},
                "errors": []
            }"#,
        )
        .unwrap();
        assert!(bundle.is_consistent());

        let short: ResultBundle = serde_json::from_str(
            r#"{"transactions": [], "wallets": {"Electrum": 2}, "errors": []}"#,
        )
        .unwrap();
        assert!(!short.is_consistent());
    }

    #[test]
    fn test_record_decodes_classifier_json() {
        let json = r#"{
            "hash": "c0ffee",
            "wallet": "Bitcoin Core",
            "vin": [{"address": "bc1qexample", "value": 1.0, "type": "v0_p2wpkh"}],
            "vout": [{"value": 0.9}],
            "totalInput": 1.0,
            "fee": 0.1,
            "blockTime": 1700000000,
            "vsize": 141,
            "reasoning": ["Signals RBF"]
        }"#;
        let tx: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(tx.total_input, Some(1.0));
        assert_eq!(tx.total_output, None);
        assert_eq!(tx.resolved_total_output(), 0.9);
        assert_eq!(tx.vin[0].script_type.as_deref(), Some("v0_p2wpkh"));
        assert_eq!(tx.weight, None);
    }
}
