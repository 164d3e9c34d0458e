use observer::api::server;
use observer::config::ObserverConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logger (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ObserverConfig::from_env();

    log::info!(
        "Starting txlens observer on {} (upstream: {})",
        config.bind_address,
        config.upstream_url
    );
    server::start_server(config).await?;
    Ok(())
}
