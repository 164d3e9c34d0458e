//! Deterministic fingerprint fabrication.
//!
//! The real classifier inspects raw transactions; this stand-in derives a
//! stable pseudo-classification from the identifier bytes alone. Same hash
//! in, same record out, which is what integration tests need.

use txlens::model::{ErrorRecord, ResultBundle, TransactionRecord, TxInput, TxOutput, WalletCounts};

const WALLETS: [&str; 8] = [
    "Bitcoin Core",
    "Electrum",
    "Blue Wallet",
    "Coinbase Wallet",
    "Exodus Wallet",
    "Trust Wallet",
    "Trezor",
    "Ledger",
];

const SCRIPT_TYPES: [&str; 4] = ["v0_p2wpkh", "p2pkh", "p2sh", "v1_p2tr"];

/// Classify a batch of transaction identifiers.
///
/// Non-hex identifiers become per-item errors; everything else gets a
/// fabricated record. The wallet counts always match the transaction list.
pub fn classify_batch(hashes: &[String]) -> ResultBundle {
    let mut transactions = Vec::new();
    let mut wallets = WalletCounts::new();
    let mut errors = Vec::new();

    for hash in hashes {
        match hex::decode(hash) {
            Ok(bytes) if !bytes.is_empty() => {
                let tx = fabricate(hash, &bytes);
                wallets.increment(&tx.wallet);
                transactions.push(tx);
            }
            _ => errors.push(ErrorRecord {
                hash: hash.clone(),
                error: "Transaction not found".to_string(),
            }),
        }
    }

    ResultBundle {
        transactions,
        wallets,
        errors,
    }
}

/// Stable 64-bit digest of the identifier bytes.
fn seed_of(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
            (acc ^ *b as u64).wrapping_mul(0x0000_0100_0000_01b3)
        })
}

fn fabricate(hash: &str, bytes: &[u8]) -> TransactionRecord {
    let seed = seed_of(bytes);

    // One in ten stays unattributed, like real fingerprinting does.
    let wallet = if seed % 10 == 9 {
        "Unclear".to_string()
    } else {
        WALLETS[(seed % WALLETS.len() as u64) as usize].to_string()
    };

    let input_count = 1 + (seed % 3) as usize;
    let output_count = 1 + ((seed >> 8) % 2) as usize;

    let vin: Vec<TxInput> = (0..input_count)
        .map(|i| {
            let sub = seed.rotate_left(i as u32 * 7 + 1);
            TxInput {
                address: Some(fake_address(sub)),
                value: Some(amount_btc(sub)),
                script_type: Some(SCRIPT_TYPES[(sub % SCRIPT_TYPES.len() as u64) as usize].to_string()),
            }
        })
        .collect();

    let total_input: f64 = vin.iter().filter_map(|i| i.value).sum();
    let fee = (1_000 + (seed % 9_000)) as f64 / 100_000_000.0;
    let total_output = ((total_input - fee) * 100_000_000.0).round() / 100_000_000.0;

    let vout: Vec<TxOutput> = (0..output_count)
        .map(|i| {
            let sub = seed.rotate_right(i as u32 * 11 + 3);
            TxOutput {
                address: Some(fake_address(sub)),
                value: Some(total_output / output_count as f64),
                script_type: Some(SCRIPT_TYPES[(sub % SCRIPT_TYPES.len() as u64) as usize].to_string()),
            }
        })
        .collect();

    let vsize = 110 + (seed % 400);

    TransactionRecord {
        hash: hash.to_string(),
        wallet,
        vin,
        vout,
        total_input: Some(total_input),
        total_output: Some(total_output),
        fee: Some(fee),
        block_time: Some(1_700_000_000 + (seed % 10_000_000) as i64),
        vsize: Some(vsize),
        weight: Some(vsize * 4 - seed % 3),
        reasoning: reasoning_for(seed),
    }
}

fn reasoning_for(seed: u64) -> Vec<String> {
    let mut reasoning = Vec::new();

    if seed & 0x01 != 0 {
        reasoning.push("Signals RBF".to_string());
    } else {
        reasoning.push("Does not signal RBF".to_string());
    }
    if seed & 0x02 != 0 {
        reasoning.push("Anti-fee-sniping".to_string());
    } else {
        reasoning.push("No Anti-fee-sniping".to_string());
    }
    if seed & 0x04 != 0 {
        reasoning.push("Low r signatures only".to_string());
    } else {
        reasoning.push("Not low-r-grinding".to_string());
    }
    reasoning.push("All compressed public keys".to_string());
    if seed & 0x08 != 0 {
        reasoning.push(format!("nVersion = {}", 1 + (seed & 0x01)));
    }
    if seed & 0x10 != 0 {
        reasoning.push("Address reuse".to_string());
    }

    reasoning
}

fn amount_btc(seed: u64) -> f64 {
    (10_000 + seed % 100_000_000) as f64 / 100_000_000.0
}

fn fake_address(seed: u64) -> String {
    format!("bc1q{:016x}{:016x}", seed, seed.rotate_left(29))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hashes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classification_is_deterministic() {
        let input = hashes(&["aabbccdd", "deadbeef"]);
        let first = classify_batch(&input);
        let second = classify_batch(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_counts_match_transactions() {
        let bundle = classify_batch(&hashes(&["aa", "bb", "cc", "dd", "not-hex"]));
        assert!(bundle.is_consistent());
        assert_eq!(bundle.transactions.len(), 4);
        assert_eq!(bundle.errors.len(), 1);
        assert_eq!(bundle.errors[0].error, "Transaction not found");
    }

    #[test]
    fn test_fabricated_amounts_are_plausible() {
        let bundle = classify_batch(&hashes(&["0123456789abcdef"]));
        let tx = &bundle.transactions[0];
        let total_in = tx.total_input.unwrap();
        let total_out = tx.total_output.unwrap();
        let fee = tx.fee.unwrap();
        assert!(total_in > 0.0);
        assert!(fee > 0.0 && fee < total_in);
        assert!((total_in - total_out - fee).abs() < 1e-8);
        assert!(!tx.reasoning.is_empty());
    }
}
