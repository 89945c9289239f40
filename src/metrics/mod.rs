//! Cache Metrics System
//!
//! Caches count what happens to their entries (hits, misses, insertions,
//! overwrites, evictions, explicit removals) and report the counters through
//! the [`CacheMetrics`] trait as a `BTreeMap<String, f64>`.
//!
//! `BTreeMap` is used so that reports always list metrics in the same order,
//! which keeps simulator output and test assertions reproducible.
//!
//! Counting is a side effect of the operations that already mutate the cache
//! (`get`, `put`, `remove`, ...). Read-only inspection (`peek`, `contains`,
//! iteration) is never counted.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod lru;

pub use lru::LruCacheMetrics;

/// Counters common to every cache.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (`get`/`get_mut`) made against the cache
    pub requests: u64,

    /// Lookups that found their key
    pub cache_hits: u64,

    /// New entries stored by `put`
    pub insertions: u64,

    /// `put` calls that overwrote the value of an existing key
    pub updates: u64,

    /// Entries dropped to make room for a new key
    pub evictions: u64,

    /// Entries removed on request (`remove`, `pop_lru`)
    pub removals: u64,

    /// Entries currently stored
    pub entries: u64,
}

impl CoreCacheMetrics {
    /// Creates an all-zero set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    ///
    /// Misses are not stored separately; they are `requests - cache_hits`.
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new entry.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
        self.entries += 1;
    }

    /// Records an in-place overwrite of an existing entry.
    #[inline]
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records an entry dropped for capacity.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
        self.entries = self.entries.saturating_sub(1);
    }

    /// Records an entry removed on request.
    #[inline]
    pub fn record_removal(&mut self) {
        self.removals += 1;
        self.entries = self.entries.saturating_sub(1);
    }

    /// Records that every entry was dropped at once.
    ///
    /// Cumulative counters are kept; only the live entry count resets.
    #[inline]
    pub fn record_clear(&mut self) {
        self.entries = 0;
    }

    /// Number of lookups that missed.
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.requests.saturating_sub(self.cache_hits)
    }

    /// Fraction of lookups that hit, between 0.0 and 1.0 (0.0 before any lookup)
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, between 0.0 and 1.0 (0.0 before any lookup)
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a report map.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("updates".to_string(), self.updates as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("entries".to_string(), self.entries as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics reporting for cache implementations.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs, sorted by name.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short name of the eviction algorithm (e.g. `"LRU"`).
    fn algorithm_name(&self) -> &'static str;
}
