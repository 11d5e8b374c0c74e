//! # Session Runtime
//!
//! ## Startup Sequence
//!
//! 1. Initialise tracing (`RUST_LOG`, default `info`)
//! 2. Load configuration from `SSO_*` variables and validate it
//! 3. Build the session core (opens storage, checks tables)
//! 4. Start the expiry cleaner
//! 5. Wait for Ctrl-C, then stop the cleaner

use anyhow::{Context, Result};
use session_runtime::{ExpiryCleaner, SessionConfig, SessionCore};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = SessionConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let core = SessionCore::open(config).context("Failed to start session core")?;
    info!(
        endpoint = %core.config.logout.endpoint,
        data_dir = %core.config.storage.data_dir.display(),
        "[runtime] Session core running. Press Ctrl+C to stop."
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let cleaner = core
        .config
        .cleaner
        .interval()
        .map(|interval| ExpiryCleaner::new(core.lifecycle.clone(), interval).spawn(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("[runtime] Shutting down");

    if let Err(e) = shutdown_tx.send(true) {
        error!("[runtime] Failed to send shutdown signal: {}", e);
    }
    if let Some(cleaner) = cleaner {
        let removed = cleaner.await.context("Expiry cleaner task failed")?;
        info!(removed, "[runtime] Shutdown complete");
    }
    Ok(())
}
