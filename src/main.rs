//! Process bootstrap: logging, configuration, store handles, HTTP server

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use flatboard::apartments::handlers::AppState;
use flatboard::config::AppConfig;
use flatboard::media::FsMediaStore;
use flatboard::storage::InMemoryApartmentStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    tracing::info!(media_root = %config.media.root.display(), "configuration loaded");

    // both store handles are owned here and injected into every handler
    let state = AppState {
        store: Arc::new(InMemoryApartmentStore::new()),
        media: Arc::new(FsMediaStore::new(config.media.root.clone())),
    };

    flatboard::server::serve(state, &config.server.bind).await
}
