//! Txlens: wallet-fingerprint analysis for observed block-explorer traffic.
//!
//! The core of an interception-to-presentation pipeline: recognize
//! transaction payloads streaming past an observation tap, aggregate the
//! classification results an external wallet classifier returns for them,
//! and present the aggregate as a filterable, exportable view.
//!
//! # Architecture
//!
//! - **Payload recognition**: typed shape checks for intercepted transfer
//!   responses
//! - **Presentation engine**: explicit view state, wallet-share summary,
//!   click-driven re-filtering over in-memory data
//! - **Export module**: round-trippable CSV and a standalone document
//!   snapshot of the rendered view
//!
//! The classifier itself is an opaque service; this crate only speaks its
//! wire format. The service half (observation proxy, session coordinator,
//! panel) lives in the `observer` crate.

// Public modules
pub mod error;
pub mod evidence;
pub mod export;
pub mod format;
pub mod model;
pub mod payload;
pub mod render;
pub mod view;

// Re-exports for convenience
pub use error::Error;
pub use evidence::{classify, EvidenceKind};
pub use export::{export_csv, export_document, CSV_FILENAME, HTML_FILENAME};
pub use format::{format_address, format_btc};
pub use model::{ErrorRecord, ResultBundle, TransactionRecord, TxInput, TxOutput, WalletCounts};
pub use payload::{recognize, PayloadError, TransferBatch, TRANSFER_PATH_MARKER};
pub use render::{render_document, render_list_fragment, RenderMode, RenderOptions, Theme};
pub use view::{ViewState, WalletShare};

// Common result type
pub type Result<T> = std::result::Result<T, Error>;
