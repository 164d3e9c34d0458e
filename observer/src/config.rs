/// Observer configuration from environment variables
///
/// Controls where the observer listens, which upstream it shadows, and how
/// rendered views link out.

use std::env;

use txlens::render::{RenderOptions, Theme};

#[derive(Clone, Debug)]
pub struct ObserverConfig {
    /// Address the observer binds to
    pub bind_address: String,
    /// Base URL of the observed host application
    pub upstream_url: String,
    /// Base URL of the external wallet classifier
    pub classifier_url: String,
    /// Block-explorer base URL for transaction links
    pub explorer_url: String,
    /// Request-path substring marking transfer responses
    pub transfer_marker: String,
    /// View theme preference (consumed, not owned, by this service)
    pub theme: Theme,
}

impl ObserverConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `BIND_ADDRESS`: listen address (default `127.0.0.1:8400`)
    /// - `UPSTREAM_URL`: host application base URL (default `http://localhost:9000`)
    /// - `CLASSIFIER_URL`: classifier base URL (default `http://localhost:8500`)
    /// - `EXPLORER_URL`: explorer link base (default `https://mempool.space/tx`)
    /// - `TRANSFER_MARKER`: path substring to observe (default `/transfers`)
    /// - `THEME`: `light` (default) or `dark`
    pub fn from_env() -> Self {
        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8400".to_string());

        let upstream_url = env::var("UPSTREAM_URL").unwrap_or_else(|_| {
            log::info!("UPSTREAM_URL not set, defaulting to http://localhost:9000");
            "http://localhost:9000".to_string()
        });

        let classifier_url = env::var("CLASSIFIER_URL").unwrap_or_else(|_| {
            log::info!("CLASSIFIER_URL not set, defaulting to http://localhost:8500");
            "http://localhost:8500".to_string()
        });

        let explorer_url =
            env::var("EXPLORER_URL").unwrap_or_else(|_| "https://mempool.space/tx".to_string());

        let transfer_marker = env::var("TRANSFER_MARKER")
            .unwrap_or_else(|_| txlens::TRANSFER_PATH_MARKER.to_string());

        let theme = match env::var("THEME").as_deref() {
            Ok("dark") => Theme::Dark,
            Ok("light") | Err(_) => Theme::Light,
            Ok(other) => {
                log::warn!("Unknown THEME '{}', defaulting to light", other);
                Theme::Light
            }
        };

        Self {
            bind_address,
            upstream_url,
            classifier_url,
            explorer_url,
            transfer_marker,
            theme,
        }
    }

    /// Render options for the analysis view.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            explorer_url: self.explorer_url.clone(),
            theme: self.theme,
            mode: txlens::RenderMode::Live,
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8400".to_string(),
            upstream_url: "http://localhost:9000".to_string(),
            classifier_url: "http://localhost:8500".to_string(),
            explorer_url: "https://mempool.space/tx".to_string(),
            transfer_marker: txlens::TRANSFER_PATH_MARKER.to_string(),
            theme: Theme::Light,
        }
    }
}
