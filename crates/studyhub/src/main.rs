//! studyhub daemon
//!
//! Serves studies and assays over HTTP using axum, backed by SQLite

use std::sync::Arc;

use color_eyre::Result;
use eyre::WrapErr;
use studyhub_core::Store;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod openapi;
mod router;
mod state;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config_path = Config::locate();
    let config = match &config_path {
        Some(path) => Config::load(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.daemon.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &config_path {
        Some(path) => info!(path = %path.display(), "loaded configuration"),
        None => warn!("no configuration file found, using defaults"),
    }

    let store = Store::connect(&config.database.url)
        .await
        .wrap_err("failed to open database")?;
    store.migrate().await.wrap_err("failed to migrate database")?;

    let state = Arc::new(AppState::new(store, &config));
    let app = router::create_router(state);

    let listener = TcpListener::bind(&config.daemon.bind)
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.daemon.bind))?;
    info!(bind = %config.daemon.bind, "studyhub daemon listening");

    axum::serve(listener, app).await?;
    Ok(())
}
