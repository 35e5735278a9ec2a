use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};

use directory_core::RecordStore;
use directory_server::{app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting companies directory server");

    let config = Config::from_env().context("Failed to load configuration from environment")?;

    let store = RecordStore::from_path(&config.data_path)
        .with_context(|| format!("Failed to load dataset from {}", config.data_path.display()))?;
    info!("Total companies loaded: {}", store.len());

    let app_state = Arc::new(AppState::new(store));
    info!("Server version {}", app_state.version);

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;
    info!("Server listening on http://{}", config.listen_addr());

    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
