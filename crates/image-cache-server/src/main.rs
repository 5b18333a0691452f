//! Image Cache Server
//!
//! Downloads remote images by URL into a public storage directory, and
//! lists, serves and deletes the cached copies.

mod acquisition;
mod config;
mod error;
mod routes;
mod server;
mod state;
mod types;

use crate::config::Config;
use crate::error::Result;
use crate::server::start_server;
use crate::state::{ServerState, SharedState};
use blob_store::FsBlobStore;
use remote_fetcher::RemoteFetcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter =
        EnvFilter::from_default_env().add_directive("image_cache_server=info".parse()?);

    // Use JSON format for Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting image cache server...");

    let config = Config::from_env();
    info!(port = config.port, app_url = %config.app_url, "Configuration loaded");
    info!("Storage root: {:?}", config.storage_root);
    info!("Fetch timeout: {} seconds", config.fetch_timeout_secs);

    let store = FsBlobStore::new(config.storage_root.clone(), &config.public_storage_url());
    store.init().await?;

    let fetcher = RemoteFetcher::with_timeout(Duration::from_secs(config.fetch_timeout_secs))?;

    let port = config.port;
    let state: SharedState = Arc::new(ServerState::new(Arc::new(store), fetcher, config));

    start_server(state, port).await?;

    Ok(())
}
