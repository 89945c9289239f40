#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Recency model
//!
//! ```text
//! put(1) put(2) get(1) put(3)            capacity = 2
//!
//!   front ──▶ [1]            MRU ... LRU
//!   front ──▶ [2] [1]
//!   front ──▶ [1] [2]        get(1) promotes 1
//!   front ──▶ [3] [1]        put(3) evicts 2, the least recently used
//! ```
//!
//! `get`, `get_mut` and `put` count as uses of a key. `peek`, `contains`,
//! `peek_lru`, `peek_mru` and iteration are read-only and never reorder.
//!
//! ## Construction
//!
//! ```rust
//! use recency_cache::{CacheError, LruCache};
//! use recency_cache::config::LruCacheConfig;
//! use core::num::NonZeroUsize;
//!
//! // Capacity known to be non-zero at compile time
//! let cache: LruCache<u64, String> = LruCache::new(NonZeroUsize::new(128).unwrap());
//! assert_eq!(cache.cap().get(), 128);
//!
//! // Capacity from untrusted input, checked at construction
//! let cache: Result<LruCache<u64, String>, CacheError> =
//!     LruCache::init(LruCacheConfig { capacity: 0 }, None);
//! assert_eq!(cache.unwrap_err(), CacheError::ZeroCapacity);
//! ```
//!
//! ## Introspection
//!
//! ```rust
//! use recency_cache::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.put("c", 3);
//! cache.get(&"a");
//!
//! let order: Vec<_> = cache.keys().copied().collect();
//! assert_eq!(order, ["a", "c", "b"]);
//! assert_eq!(cache.peek_lru(), Some((&"b", &2)));
//! ```
//!
//! ## Metrics
//!
//! ```rust
//! use recency_cache::LruCache;
//! use recency_cache::metrics::CacheMetrics;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = LruCache::new(NonZeroUsize::new(1).unwrap());
//! cache.put(1, "one");
//! cache.get(&1);
//! cache.get(&2);
//!
//! let metrics = cache.metrics();
//! assert_eq!(metrics["hit_rate"], 0.5);
//! assert_eq!(cache.algorithm_name(), "LRU");
//! ```
//!
//! ## Modules
//!
//! - [`lru`]: Least Recently Used cache implementation
//! - [`config`]: Configuration structures
//! - [`error`]: Construction errors
//! - [`metrics`]: Metrics collection for cache performance monitoring
//! - `concurrent`: Thread-safe cache (requires the `concurrent` feature)

#![no_std]

#[cfg(test)]
extern crate scoped_threadpool;

extern crate alloc;

#[cfg(not(feature = "hashbrown"))]
extern crate std;

/// Arena-backed doubly linked list that orders entries by recency.
///
/// Internal infrastructure: nodes are addressed by slot handles that the
/// cache index stores. Use the cache types instead.
pub(crate) mod list;

/// Cache configuration structures.
pub mod config;

/// Error types returned when building a cache.
pub mod error;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least recently used items when
/// the capacity is reached.
pub mod lru;

/// Cache metrics system.
///
/// Counters for hits, misses, insertions, updates, evictions and removals,
/// reported through the [`CacheMetrics`](metrics::CacheMetrics) trait.
pub mod metrics;

/// Concurrent cache implementations.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use error::CacheError;
pub use lru::LruCache;

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentLruCache;
