//! CSV export of the currently filtered transaction set.
//!
//! Every field is quoted and embedded quotes are doubled, so the output
//! survives commas, newlines and quotes inside field values. [`parse`] is
//! the conforming reader backing the round-trip guarantee.

use serde::Serialize;

use crate::format::{format_block_time_iso, format_btc};
use crate::model::{TxInput, TxOutput};
use crate::view::ViewState;
use crate::Error;

/// Fixed download filename for the tabular export.
pub const CSV_FILENAME: &str = "analysis.csv";

const HEADER: [&str; 11] = [
    "hash",
    "wallet",
    "total_input_btc",
    "total_output_btc",
    "fee_btc",
    "inputs",
    "outputs",
    "reasoning",
    "block_time",
    "vsize",
    "weight",
];

/// Input/output as serialized into the CSV `inputs`/`outputs` columns.
#[derive(Serialize)]
struct SlimIo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    script_type: Option<&'a str>,
}

impl<'a> From<&'a TxInput> for SlimIo<'a> {
    fn from(io: &'a TxInput) -> Self {
        Self {
            address: io.address.as_deref(),
            value: io.value,
            script_type: io.script_type.as_deref(),
        }
    }
}

impl<'a> From<&'a TxOutput> for SlimIo<'a> {
    fn from(io: &'a TxOutput) -> Self {
        Self {
            address: io.address.as_deref(),
            value: io.value,
            script_type: io.script_type.as_deref(),
        }
    }
}

/// Serialize the view's visible transactions. An active wallet filter
/// narrows the export: the artifact reflects what the user is looking at.
pub fn export_csv(view: &ViewState) -> crate::Result<String> {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(view.visible_transactions().len() + 1);
    rows.push(HEADER.iter().map(|h| h.to_string()).collect());

    for tx in view.visible_transactions() {
        let inputs: Vec<SlimIo> = tx.vin.iter().map(SlimIo::from).collect();
        let outputs: Vec<SlimIo> = tx.vout.iter().map(SlimIo::from).collect();

        rows.push(vec![
            tx.hash.clone(),
            tx.wallet.clone(),
            format_btc(tx.total_input),
            format_btc(tx.total_output),
            format_btc(tx.fee),
            serde_json::to_string(&inputs)?,
            serde_json::to_string(&outputs)?,
            tx.reasoning.join("; "),
            tx.block_time.map(format_block_time_iso).unwrap_or_default(),
            tx.vsize.map(|v| v.to_string()).unwrap_or_default(),
            tx.weight.map(|w| w.to_string()).unwrap_or_default(),
        ]);
    }

    Ok(rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|field| quote_field(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Conforming CSV reader: quoted and unquoted fields, doubled-quote escapes,
/// commas and newlines inside quoted fields.
pub fn parse(text: &str) -> crate::Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
        } else {
            match c {
                '"' => {
                    if field.is_empty() {
                        in_quotes = true;
                    } else {
                        return Err(Error::Csv("quote inside unquoted field".to_string()));
                    }
                }
                ',' => {
                    row.push(std::mem::take(&mut field));
                }
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                        row.push(std::mem::take(&mut field));
                        rows.push(std::mem::take(&mut row));
                    } else {
                        field.push(c);
                    }
                }
                _ => field.push(c),
            }
        }
    }

    if in_quotes {
        return Err(Error::Csv("unterminated quoted field".to_string()));
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}
