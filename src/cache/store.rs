//! Cache Store Module
//!
//! The get/set contract every persistent backend fulfils, plus an in-process
//! implementation used as an injectable fake.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::entry::{current_timestamp_ms, is_expired_at};
use crate::cache::CacheEntry;
use crate::error::Result;

// == Store Trait ==
/// Key/value store holding memoized results.
///
/// `get` returns `Ok(None)` for both absent and expired keys. Any `Err` means
/// the store itself failed and must not be read as a miss.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the stored value if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores a value, replacing any previous one. With `ttl` the entry stops
    /// being returned by `get` once that duration has elapsed.
    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()>;

    /// Removes a key. Returns whether an entry existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Removes every entry.
    async fn clear(&self) -> Result<()>;

    /// Removes all expired entries and returns how many were dropped.
    async fn purge_expired(&self) -> Result<usize>;
}

// == Memory Store ==
/// In-process store with the same expiry semantics as the SQLite store.
///
/// Contents do not survive the process; intended for tests and for callers
/// that want memoization scoped to one run.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut entries = self.entries.write().await;

        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                // Lazy eviction
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry::new(value, ttl);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !is_expired_at(entry.expires_at, now));
        Ok(before - entries.len())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let store = MemoryStore::new();

        store.set("key1", json!({"title": "one"}), None).await.unwrap();
        let value = store.get("key1").await.unwrap();

        assert_eq!(value, Some(json!({"title": "one"})));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_delete() {
        let store = MemoryStore::new();

        store.set("key1", json!(1), None).await.unwrap();
        assert!(store.delete("key1").await.unwrap());
        assert!(!store.delete("key1").await.unwrap());

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_overwrite() {
        let store = MemoryStore::new();

        store.set("key1", json!("value1"), None).await.unwrap();
        store.set("key1", json!("value2"), None).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(json!("value2")));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_ttl_expiration_evicts_lazily() {
        let store = MemoryStore::new();

        store
            .set("key1", json!("value1"), Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(store.get("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;

        // Still held until the next read
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("key1").await.unwrap(), None);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_store_purge_expired() {
        let store = MemoryStore::new();

        store
            .set("short", json!(1), Some(Duration::from_millis(20)))
            .await
            .unwrap();
        store
            .set("long", json!(2), Some(Duration::from_secs(60)))
            .await
            .unwrap();
        store.set("forever", json!(3), None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.get("long").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_store_clear() {
        let store = MemoryStore::new();
        store.set("a", json!(1), None).await.unwrap();
        store.set("b", json!(2), None).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.is_empty().await);
    }
}
