//! Horse Registry HTTP Server Binary
//!
//! This is the main entry point for the horse registry REST API server.
//! It loads configuration, initializes the repository, sets up the HTTP router,
//! and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin horse-registry-server
//!
//! # With an explicit configuration file
//! HORSE_REGISTRY_CONFIG=registry.toml cargo run --bin horse-registry-server
//! ```
//!
//! # Environment Variables
//!
//! - `HORSE_REGISTRY_CONFIG`: Path to the TOML configuration file
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `MAX_GENERATIONS`: Largest accepted family tree depth (default: 10)
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use horse_registry::config::RegistryConfig;
use horse_registry::db;
use horse_registry::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; `log` records from the library are bridged in.
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting horse registry HTTP server");

    let config = RegistryConfig::load().context("Failed to load configuration")?;
    info!(
        max_generations = config.pedigree.max_generations,
        seed_file = ?config.repository.seed_file,
        "Configuration loaded"
    );

    // Initialize global repository once and reuse it across the app
    db::init_repository(&config).await?;
    let repository = Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    let state = AppState::new(repository, config.pedigree);
    let app = create_router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
