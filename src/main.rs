mod api;
mod catalog;
mod config;
mod controller;
mod http;
mod models;
mod pagination;
mod player;
mod query;
mod radio_browser;
mod server;
mod sessions;
mod ui;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = config::AppConfig::load().context("Failed to load config")?;
    let state = server::AppState::new(config)?;
    server::serve(state).await
}
