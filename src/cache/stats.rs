//! Cache Statistics Module
//!
//! Tracks how a memoized operation is being served.

use serde::Serialize;

// == Cache Stats ==
/// Per-wrapper counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Calls answered from the store
    pub hits: u64,
    /// Calls that found nothing and ran the operation
    pub misses: u64,
    /// Results written to the store
    pub stores: u64,
    /// Calls where the store was skipped or failed under the bypass policy:
    /// cache disabled, key not buildable, read failed, or write failed
    pub bypasses: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_store(&mut self) {
        self.stores += 1;
    }

    pub fn record_bypass(&mut self) {
        self.bypasses += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate(), 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_bypasses_do_not_affect_hit_rate() {
        let mut stats = CacheStats::new();
        stats.record_bypass();
        stats.record_bypass();
        stats.record_miss();
        stats.record_store();

        assert_eq!(stats.bypasses, 2);
        assert_eq!(stats.stores, 1);
        assert_eq!(stats.hit_rate(), 0.0);
    }
}
