//! Shot Grid HTTP Server Binary
//!
//! Main entry point for the shot grid REST API. It loads configuration,
//! opens the cache, builds the services and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Filesystem cache in ./cache (default)
//! cargo run --bin shotgrid-server
//!
//! # In-memory cache on another port
//! CACHE_BACKEND=local PORT=9000 cargo run --bin shotgrid-server
//! ```
//!
//! # Environment Variables
//!
//! - `SHOTGRID_CONFIG`: Path to a TOML config file (default: first `shotgrid.toml` found)
//! - `HOST`, `PORT`: Bind address (default: 0.0.0.0:8000)
//! - `CACHE_BACKEND`, `CACHE_DIR`: Cache backend and directory
//! - `UPSTREAM_BASE_URL`, `UPSTREAM_TIMEOUT_SECS`: Stats API settings
//! - `ROSTER_PATH`: Roster JSON replacing the embedded one
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shotgrid::config::AppConfig;
use shotgrid::db::RepositoryFactory;
use shotgrid::http::{create_router, AppState};
use shotgrid::services::{PlayerDirectory, Roster, ShotGridOptions, ShotGridService};
use shotgrid::upstream::StatsApiProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting shot grid server");

    let config = AppConfig::load().context("Failed to load configuration")?;

    let cache = RepositoryFactory::from_settings(&config.cache)
        .await
        .context("Failed to open cache")?;

    let provider = StatsApiProvider::new(&config.upstream)
        .context("Failed to build upstream client")?;
    info!(base_url = %config.upstream.base_url, "upstream provider ready");

    let roster = Roster::load(config.roster.path.as_deref())?;
    info!(players = roster.len(), "roster loaded");

    let shot_grid = ShotGridService::with_options(
        cache,
        Arc::new(provider),
        ShotGridOptions::from(&config.cache),
    );
    let state = AppState::new(shot_grid, PlayerDirectory::new(roster));

    let app = create_router(state, &config.server.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
