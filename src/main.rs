//! memocache - cache maintenance
//!
//! Opens the configured cache store and removes expired entries.

use anyhow::Context;
use tracing::info;

use memocache::{telemetry, CacheConfig, SqliteStore, Store};

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the cache store
/// 4. Purge expired entries
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: store_path={}, disabled={}",
        config.store_path.display(),
        config.switch.is_disabled()
    );

    let store = SqliteStore::open(&config.store_path)
        .await
        .context("failed to open cache store")?;

    let removed = store
        .purge_expired()
        .await
        .context("failed to purge expired entries")?;
    let remaining = store.len().await?;
    info!("Purged {} expired entries, {} remain", removed, remaining);

    store.close().await;
    Ok(())
}
