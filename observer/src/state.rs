//! Shared application state for the observer service.

use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use txlens::payload::TransferBatch;
use txlens::view::ViewState;

use crate::classifier::ClassifierClient;
use crate::config::ObserverConfig;
use crate::panel::Panel;
use crate::session::Session;

/// State shared across handlers and the ingest task.
///
/// Locks are never held across await points: handlers snapshot what they
/// need, await the boundary call, then re-lock to store the settled result.
pub struct AppState {
    pub config: ObserverConfig,
    pub classifier: ClassifierClient,
    /// Client used for upstream proxying.
    pub http: reqwest::Client,
    pub session: RwLock<Session>,
    pub panel: RwLock<Panel>,
    /// The currently rendered view. A fresh analysis replaces it wholesale.
    pub view: RwLock<Option<ViewState>>,
    /// Fire-and-forget channel from the observation tap to the ingest task.
    pub tap: mpsc::UnboundedSender<TransferBatch>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build the shared state plus the receiving half of the tap channel.
    pub fn new(config: ObserverConfig) -> (SharedState, mpsc::UnboundedReceiver<TransferBatch>) {
        let (tap, rx) = mpsc::unbounded_channel();
        let classifier = ClassifierClient::new(&config.classifier_url);

        // Redirects pass through to the proxied client; following them here
        // would alter what the host application observes.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build proxy HTTP client");

        let state = Arc::new(Self {
            classifier,
            http,
            session: RwLock::new(Session::new()),
            panel: RwLock::new(Panel::new()),
            view: RwLock::new(None),
            tap,
            config,
        });

        (state, rx)
    }
}
