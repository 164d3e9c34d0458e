//! Display formatting for amounts, addresses and block times.

use chrono::{DateTime, SecondsFormat, Utc};

/// Rendered in place of a missing or invalid amount. Distinct from a real
/// zero, which renders as `0.00000000`.
pub const AMOUNT_PLACEHOLDER: &str = "-";

/// Rendered in place of an absent address (non-standard scripts).
pub const ADDRESS_PLACEHOLDER: &str = "—";

const ADDRESS_SHORTEN_THRESHOLD: usize = 18;
const ADDRESS_AFFIX_LEN: usize = 8;

/// Format a BTC amount with exactly 8 fractional digits.
pub fn format_btc(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.8}", v),
        _ => AMOUNT_PLACEHOLDER.to_string(),
    }
}

/// Shorten long addresses to an 8-char prefix, an ellipsis and an 8-char
/// suffix. Addresses of 18 characters or fewer render in full.
pub fn format_address(address: Option<&str>) -> String {
    let address = match address {
        Some(a) if !a.is_empty() => a,
        _ => return ADDRESS_PLACEHOLDER.to_string(),
    };

    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= ADDRESS_SHORTEN_THRESHOLD {
        return address.to_string();
    }

    let prefix: String = chars[..ADDRESS_AFFIX_LEN].iter().collect();
    let suffix: String = chars[chars.len() - ADDRESS_AFFIX_LEN..].iter().collect();
    format!("{}…{}", prefix, suffix)
}

/// Human-readable block time from the record's own epoch seconds.
pub fn format_block_time(epoch_secs: i64) -> String {
    match DateTime::<Utc>::from_timestamp(epoch_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => AMOUNT_PLACEHOLDER.to_string(),
    }
}

/// ISO-8601 block time for exports, empty-safe at the call site.
pub fn format_block_time_iso(epoch_secs: i64) -> String {
    match DateTime::<Utc>::from_timestamp(epoch_secs, 0) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => String::new(),
    }
}
