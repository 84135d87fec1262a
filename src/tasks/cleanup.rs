//! Expired Entry Purge Task
//!
//! Background task that periodically deletes expired rows from a store.
//! Stores already hide expired entries on read; this keeps the file small.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::Store;

/// Spawns a background task that purges expired entries every `interval`.
///
/// Store errors are logged and the loop keeps going. Abort the returned
/// handle to stop it.
///
/// # Example
/// ```ignore
/// let store: Arc<dyn Store> = Arc::new(SqliteStore::open(path).await?);
/// let purge_handle = spawn_purge_task(store.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task(store: Arc<dyn Store>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting cache purge task");

        loop {
            tokio::time::sleep(interval).await;

            match store.purge_expired().await {
                Ok(0) => debug!("Cache purge: no expired entries found"),
                Ok(removed) => info!("Cache purge: removed {} expired entries", removed),
                Err(e) => warn!(error = %e, "Cache purge failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_purge_task_removes_expired_entries() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("expire_soon", json!("value"), Some(Duration::from_millis(20)))
            .await
            .unwrap();

        let handle = spawn_purge_task(store.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(store.is_empty().await, "Expired entry should have been purged");

        handle.abort();
    }

    #[tokio::test]
    async fn test_purge_task_preserves_valid_entries() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("long_lived", json!("value"), Some(Duration::from_secs(3600)))
            .await
            .unwrap();
        store.set("forever", json!("value"), None).await.unwrap();

        let handle = spawn_purge_task(store.clone(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.len().await, 2);
        assert_eq!(store.get("long_lived").await.unwrap(), Some(json!("value")));

        handle.abort();
    }

    #[tokio::test]
    async fn test_purge_task_can_be_aborted() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

        let handle = spawn_purge_task(store, Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
