//! liquidity-ledger server entry point.
//!
//! Loads configuration, opens the ledger store, and serves the REST and
//! WebSocket endpoints.

use tracing_subscriber::EnvFilter;

use liquidity_ledger::app::build_app;
use liquidity_ledger::app_state::AppState;
use liquidity_ledger::config::{LedgerConfig, LogFormat};
use liquidity_ledger::domain::EventBus;
use liquidity_ledger::service::LedgerService;
use liquidity_ledger::storage::open_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (.env first, then the process environment)
    let config = LedgerConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        backend = ?config.storage_backend,
        missing_pool_policy = ?config.missing_pool_policy,
        "starting liquidity-ledger"
    );

    // Storage and service layer
    let store = open_store(&config).await?;
    let event_bus = EventBus::new(config.event_bus_capacity);
    let ledger = LedgerService::new(store, event_bus, config.missing_pool_policy);

    let app = build_app(AppState::new(ledger));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
