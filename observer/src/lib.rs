//! Observer: the service half of the txlens pipeline.
//!
//! A pass-through reverse proxy observes the host application's traffic and
//! forwards recognized transfer payloads, fire-and-forget, to the session
//! coordinator. A small panel state machine gates user-triggered
//! classification requests, and an HTTP API exposes the rendered analysis
//! view plus CSV/HTML exports.

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod ingest;
pub mod panel;
pub mod proxy;
pub mod session;
pub mod state;

pub use classifier::ClassifierClient;
pub use config::ObserverConfig;
pub use error::ObserverError;
pub use panel::{Panel, PanelState};
pub use session::{Session, StoredAnalysis};
pub use state::{AppState, SharedState};
