//! memocache - Persistent memoization for async operations
//!
//! Results of expensive async calls are stored in a local SQLite file keyed
//! by call identity and arguments, and reused across process runs until
//! their TTL expires. Also provides hierarchical config file loading.

pub mod cache;
pub mod config;
pub mod error;
pub mod settings;
pub mod tasks;
pub mod telemetry;

pub use cache::{
    wrap, CacheKey, DisableSwitch, MemoConfig, Memoized, MemoryStore, OperationId, SqliteStore,
    Store, StoreErrorPolicy, ONE_DAY,
};
pub use config::CacheConfig;
pub use error::{CacheError, ConfigError};
pub use settings::{read_config, write_config, ConfigLoader};
pub use tasks::spawn_purge_task;
