use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use crate::config::ObserverConfig;
use crate::ingest;
use crate::proxy;
use crate::state::{AppState, SharedState};

pub fn create_router(state: SharedState) -> Router {
    // Configure CORS based on environment
    // Set ALLOWED_ORIGINS="https://app.example.com" for production
    // If not set, allows any origin (development mode)
    let cors = match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            log::info!("CORS configured for origins: {}", origins);
            let origin_list: Vec<_> = origins
                .split(',')
                .map(|s| s.trim().parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    Router::new()
        // Panel routes
        .route("/panel", get(handlers::panel_page_handler))
        .route("/panel/status", get(handlers::panel_status_handler))
        .route("/panel/analyze", post(handlers::panel_analyze_handler))
        .route("/panel/toggle", post(handlers::panel_toggle_handler))
        .route("/panel/open", post(handlers::panel_open_handler))
        // Session / analysis routes
        .route("/api/transactions", get(handlers::transactions_handler))
        .route("/api/analyze", post(handlers::analyze_handler))
        .route("/api/analysis", get(handlers::analysis_handler))
        .route(
            "/api/analysis/:cluster",
            get(handlers::cached_analysis_handler),
        )
        // Analysis view
        .route("/view", get(handlers::view_handler))
        .route("/view/filter", get(handlers::view_filter_handler))
        // Exports
        .route("/export/analysis.csv", get(handlers::export_csv_handler))
        .route("/export/analysis.html", get(handlers::export_html_handler))
        // Everything else shadows the upstream
        .fallback(proxy::proxy_handler)
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: ObserverConfig) -> anyhow::Result<()> {
    let bind_address = config.bind_address.clone();
    let (state, tap_rx) = AppState::new(config);

    ingest::spawn_ingest(state.clone(), tap_rx);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log::info!("Observer listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    log::info!("Shutdown signal received, exiting gracefully...");
}
