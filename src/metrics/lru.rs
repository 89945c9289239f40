//! LRU Cache Metrics
//!
//! Metrics specific to the LRU (Least Recently Used) cache algorithm.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// LRU metrics: the core counters plus the configured capacity, which
/// gives the fill ratio.
#[derive(Debug, Clone)]
pub struct LruCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,
    /// Configured entry capacity
    pub capacity: u64,
}

impl LruCacheMetrics {
    /// Creates zeroed metrics for a cache of the given entry capacity.
    pub fn new(capacity: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(),
            capacity,
        }
    }

    /// Fraction of the capacity currently in use, between 0.0 and 1.0.
    pub fn utilization(&self) -> f64 {
        if self.capacity > 0 {
            self.core.entries as f64 / self.capacity as f64
        } else {
            0.0
        }
    }

    /// Converts LRU metrics to a report map.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("capacity".to_string(), self.capacity as f64);
        metrics.insert("utilization".to_string(), self.utilization());
        metrics
    }
}

impl CacheMetrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
