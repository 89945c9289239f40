// Data models for cache simulation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A single cache request as it appears in a trace file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Unix timestamp of the request, in seconds
    pub timestamp: u64,
    /// Cache key
    pub key: String,
}

impl Request {
    /// Create a new request
    pub fn new(timestamp: u64, key: impl Into<String>) -> Self {
        Self {
            timestamp,
            key: key.into(),
        }
    }
}

/// Cache implementations replayed by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheImpl {
    /// The `lru` crate, used as the reference model for strict LRU
    Reference,
    /// `recency_cache::LruCache`
    Sequential,
    /// `recency_cache::ConcurrentLruCache`
    Concurrent,
}

impl CacheImpl {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheImpl::Reference => "lru-crate",
            CacheImpl::Sequential => "LruCache",
            CacheImpl::Concurrent => "ConcurrentLruCache",
        }
    }

    /// Get all implementations, reference first
    pub fn all() -> Vec<CacheImpl> {
        vec![
            CacheImpl::Reference,
            CacheImpl::Sequential,
            CacheImpl::Concurrent,
        ]
    }

    /// Parse a command line name (`reference`, `sequential`, `concurrent`)
    pub fn from_name(name: &str) -> Option<CacheImpl> {
        match name.trim().to_ascii_lowercase().as_str() {
            "reference" | "lru-crate" => Some(CacheImpl::Reference),
            "sequential" | "lrucache" => Some(CacheImpl::Sequential),
            "concurrent" | "concurrentlrucache" => Some(CacheImpl::Concurrent),
            _ => None,
        }
    }
}

impl fmt::Display for CacheImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Directory containing input trace files
    pub input_dir: PathBuf,
    /// Cache capacity in number of entries
    pub capacity: usize,
    /// Implementations to replay; the reference model is always included
    pub implementations: Vec<CacheImpl>,
}

/// First request on which an implementation disagreed with the reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// Zero-based position of the request in the replayed stream
    pub request_index: usize,
    /// Key of the request
    pub key: String,
    /// Implementation that disagreed
    pub implementation: CacheImpl,
    /// Whether the reference model hit
    pub reference_hit: bool,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} diverged from the reference at request {} (key {:?}): reference {}, {} {}",
            self.implementation,
            self.request_index,
            self.key,
            if self.reference_hit { "hit" } else { "missed" },
            self.implementation,
            if self.reference_hit { "missed" } else { "hit" },
        )
    }
}

/// Results of a simulation run
#[derive(Debug)]
pub struct SimulationResult {
    /// Statistics for each implementation
    pub stats: BTreeMap<CacheImpl, ImplStats>,
    /// Total number of requests processed
    pub total_requests: usize,
    /// Number of distinct keys in the trace
    pub unique_keys: usize,
    /// Wall-clock duration of the replay
    pub duration: Duration,
    /// Cache capacity used
    pub capacity: usize,
    /// First disagreement with the reference model, if any
    pub divergence: Option<Divergence>,
}

/// Statistics for a single implementation
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImplStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of entries evicted for capacity
    pub evictions: usize,
    /// Entries resident at the end of the replay
    pub final_len: usize,
    /// Time spent inside cache operations, in nanoseconds
    pub op_time_ns: u64,
}

impl ImplStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate hit rate as percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Average time per request in nanoseconds
    pub fn avg_ns(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.op_time_ns as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Requests per second spent inside the cache
    pub fn ops_per_sec(&self) -> f64 {
        if self.op_time_ns > 0 {
            ((self.hits + self.misses) as f64 * 1_000_000_000.0) / self.op_time_ns as f64
        } else {
            0.0
        }
    }
}

/// CSV export row for simulation results
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub implementation: String,
    pub capacity: usize,
    pub requests: usize,
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
    pub hit_rate: f64,
    pub final_len: usize,
    pub op_time_ns: u64,
    pub avg_ns: f64,
    pub ops_per_sec: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = ImplStats {
            hits: 3,
            misses: 1,
            ..ImplStats::new()
        };
        assert_eq!(stats.hit_rate(), 75.0);
        assert_eq!(ImplStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_impl_names_round_trip() {
        for implementation in CacheImpl::all() {
            assert_eq!(
                CacheImpl::from_name(implementation.as_str()),
                Some(implementation)
            );
        }
        assert_eq!(CacheImpl::from_name("Concurrent"), Some(CacheImpl::Concurrent));
        assert_eq!(CacheImpl::from_name("slru"), None);
    }

    #[test]
    fn test_divergence_message() {
        let divergence = Divergence {
            request_index: 7,
            key: "k".to_string(),
            implementation: CacheImpl::Sequential,
            reference_hit: true,
        };
        assert_eq!(
            divergence.to_string(),
            "LruCache diverged from the reference at request 7 (key \"k\"): reference hit, LruCache missed"
        );
    }
}
