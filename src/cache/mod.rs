//! Cache Module
//!
//! Persistent memoization of async operations: key building, the store
//! contract and its backends, and the memoizing wrapper.

mod entry;
mod key;
mod memoize;
mod sqlite;
mod stats;
mod store;
mod switch;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use key::{canonical_json, CacheKey, KeyArgs, OperationId};
pub use memoize::{wrap, MemoConfig, Memoized, PrefixFn, StoreErrorPolicy};
pub use sqlite::SqliteStore;
pub use stats::CacheStats;
pub use store::{MemoryStore, Store};
pub use switch::{DisableSwitch, DISABLE_ENV_VAR};

// == Public Constants ==
/// One day, in minutes, for `MemoConfig::minutes`.
pub const ONE_DAY: u64 = 60 * 24;
