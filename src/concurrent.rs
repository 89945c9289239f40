//! Concurrent Cache Implementations
//!
//! Thread-safe caches for multi-threaded access, available with the
//! `concurrent` feature.
//!
//! # Why one Mutex?
//!
//! An LRU `get()` is a write: it moves the accessed entry to the front of the
//! recency list. A `RwLock` would therefore give no read parallelism, and
//! `parking_lot::Mutex` has less bookkeeping.
//!
//! Splitting the key space into independently locked shards would weaken the
//! eviction policy (each shard would evict its own oldest entry, not the
//! globally oldest one), so the whole cache sits behind a single lock and
//! every operation is atomic with respect to every other.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ConcurrentLruCache`] | Thread-safe LRU cache with strict global recency |

mod lru;

pub use self::lru::ConcurrentLruCache;
