//! Configuration Module
//!
//! Settings of the cache layer itself, loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::DisableSwitch;

/// Name used for the application directory, env variables and rc files.
pub const APP_NAME: &str = "memocache";

/// Cache layer configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// SQLite file holding cached results
    pub store_path: PathBuf,
    /// Process-wide disable switch
    pub switch: DisableSwitch,
    /// Seconds between background purges of expired entries
    pub purge_interval: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMOCACHE_DISABLE_CACHE` - Disables caching when set to any value
    /// - `MEMOCACHE_CACHE_PATH` - Store file (default: `$HOME/.memocache/cache.sqlite3`)
    /// - `MEMOCACHE_PURGE_INTERVAL` - Purge frequency in seconds (default: 300)
    /// - `HOME` - Home directory used for the default store path
    pub fn from_env() -> Self {
        Self {
            store_path: env::var_os("MEMOCACHE_CACHE_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_store_path),
            switch: DisableSwitch::from_env(),
            purge_interval: env::var("MEMOCACHE_PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(300),
        }
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            switch: DisableSwitch::enabled(),
            purge_interval: 300,
        }
    }
}

/// `$HOME`, falling back to the platform's notion of the home directory.
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()))
}

/// `~/.memocache/cache.sqlite3`, or relative to the working directory when
/// no home directory is known.
pub fn default_store_path() -> PathBuf {
    home_dir()
        .unwrap_or_default()
        .join(format!(".{}", APP_NAME))
        .join("cache.sqlite3")
}
