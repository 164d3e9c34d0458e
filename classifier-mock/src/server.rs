/// Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;

pub fn create_router() -> Router {
    // Allow requests from the observer and tests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Classification endpoint
        .route("/analyze", post(handlers::analyze))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(host: String, port: u16) -> anyhow::Result<()> {
    let app = create_router();

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("Classifier mock listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
