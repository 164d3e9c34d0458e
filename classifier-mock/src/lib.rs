/// Classifier Mock Server Library
///
/// This crate provides both a standalone binary and library components for
/// mocking the external wallet-classifier service. Classifications are a
/// deterministic function of each transaction identifier, so tests get
/// stable, repeatable bundles.

pub mod engine;
pub mod handlers;
pub mod server;
pub mod types;

// Re-export commonly used pieces
pub use engine::classify_batch;
pub use server::{create_router, run_server};
pub use types::AnalyzeRequest;
