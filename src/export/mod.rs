//! Durable exports of the current view: delimited text and a standalone
//! document snapshot.

pub mod csv;
pub mod document;

pub use csv::{export_csv, CSV_FILENAME};
pub use document::{export_document, HTML_FILENAME};
