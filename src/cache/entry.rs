//! Cache Entry Module
//!
//! Defines the record kept for each memoized result, with TTL support.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

// == Cache Entry ==
/// A stored result together with its expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored value, already in canonical JSON form
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Optional time-to-live measured from now
    pub fn new(value: Value, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| current_timestamp_ms().saturating_add(ttl_to_ms(ttl)));

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal
    /// to its expiration time.
    pub fn is_expired(&self) -> bool {
        is_expired_at(self.expires_at, current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Expiry rule shared by every store: `now >= expires_at`.
pub(crate) fn is_expired_at(expires_at: Option<i64>, now: i64) -> bool {
    match expires_at {
        Some(expires) => now >= expires,
        None => false,
    }
}

pub(crate) fn ttl_to_ms(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}
