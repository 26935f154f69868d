//! Tally survey submission service.
//!
//! Main entry point. Initializes tracing, loads configuration, opens the
//! SQLite row store and serves the HTTP API until shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use tally_api::{AppState, Config};
use tally_core::{RealClock, SqliteStore};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting Tally survey submission service");

    let config = Config::load()?;
    info!(
        store_path = %config.store_path,
        table = %config.table_name,
        host = %config.host,
        port = config.port,
        "Configuration loaded"
    );

    let addr = config.parse_server_addr()?;

    let store = SqliteStore::connect(&config.store_url())
        .await
        .with_context(|| format!("Failed to open row store at {}", config.store_path))?;
    info!("Row store ready");

    let state =
        AppState::new(Arc::new(store.clone()), Arc::new(RealClock::new()), &config.table_name);

    info!(%addr, "Tally is ready to receive submissions");
    tally_api::start_server(state, addr, config.request_timeout())
        .await
        .context("Server failed")?;

    store.close().await;
    info!("Tally shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,tally=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
