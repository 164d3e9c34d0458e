/// Common test utilities for observer integration tests
///
/// Spins up the full local stack on ephemeral ports: a stub upstream
/// standing in for the observed host application, the classifier mock, and
/// the observer router itself.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use observer::api::server::create_router;
use observer::config::ObserverConfig;
use observer::ingest::spawn_ingest;
use observer::state::{AppState, SharedState};

pub fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// Serve a router on an ephemeral port, returning its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

/// Stub of the observed host application: serves transfer payloads plus a
/// couple of unrelated endpoints.
pub fn upstream_stub() -> Router {
    Router::new()
        .route(
            "/api/clusters/:cluster/transfers",
            get(|| async { Json(transfer_payload()) }),
        )
        .route(
            "/api/clusters/:cluster/balances",
            get(|| async { Json(json!({"balance": 42})) }),
        )
        .route("/plain", get(|| async { "plain text body" }))
}

pub fn transfer_payload() -> Value {
    json!([
        {"hash": "c0ffee01", "amount": 1.25},
        {"hash": "deadbeef", "amount": 0.5},
    ])
}

pub struct TestStack {
    pub state: SharedState,
    pub observer_url: String,
    pub upstream_url: String,
    pub client: reqwest::Client,
}

impl TestStack {
    /// Full stack: upstream stub + classifier mock + observer.
    pub async fn new() -> Self {
        Self::with_classifier_url(None).await
    }

    /// Same, but pointing the observer at an arbitrary classifier URL
    /// (e.g. a dead port, to exercise failure paths).
    pub async fn with_classifier_url(classifier_url: Option<String>) -> Self {
        init_logging();

        let upstream_url = serve(upstream_stub()).await;
        let classifier_url = match classifier_url {
            Some(url) => url,
            None => serve(classifier_mock::create_router()).await,
        };

        let config = ObserverConfig {
            upstream_url: upstream_url.clone(),
            classifier_url,
            ..Default::default()
        };

        let (state, tap_rx) = AppState::new(config);
        spawn_ingest(state.clone(), tap_rx);
        let observer_url = serve(create_router(state.clone())).await;

        Self {
            state,
            observer_url,
            upstream_url,
            client: reqwest::Client::new(),
        }
    }

    /// Drive a transfer response through the proxy and give the ingest task
    /// a moment to drain the tap channel.
    pub async fn observe_transfers(&self, cluster: &str) -> reqwest::Response {
        let response = self
            .client
            .get(format!(
                "{}/api/clusters/{}/transfers",
                self.observer_url, cluster
            ))
            .send()
            .await
            .expect("proxied transfer request");
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        response
    }
}
