//! Request Statistics Module
//!
//! Counts how requests were served: from cache, live, or not at all.

use serde::Serialize;

// == Request Stats ==
/// Per-orchestrator request counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestStats {
    /// Requests answered from a valid cache entry
    pub cache_hits: u64,
    /// Cacheable requests that found no valid entry
    pub cache_misses: u64,
    /// Cacheable requests that skipped the cache on purpose
    pub forced_refreshes: u64,
    /// Calls issued through the transport
    pub live_calls: u64,
    /// Live calls for descriptors without a TTL
    pub uncached_calls: u64,
    /// Live calls that failed
    pub failures: u64,
}

impl RequestStats {
    /// Creates a new RequestStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no cacheable request was made.
    ///
    /// Forced refreshes count as neither.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.cache_misses += 1;
    }

    pub(crate) fn record_forced(&mut self) {
        self.forced_refreshes += 1;
    }

    pub(crate) fn record_live_call(&mut self, cached: bool) {
        self.live_calls += 1;
        if !cached {
            self.uncached_calls += 1;
        }
    }

    pub(crate) fn record_failure(&mut self) {
        self.failures += 1;
    }
}
