//! Concurrent LRU Cache Implementation
//!
//! A thread-safe LRU cache: one [`parking_lot::Mutex`] around one LRU
//! segment. This is the multi-threaded counterpart to
//! [`LruCache`](crate::LruCache).
//!
//! ```text
//! ┌───────────────────────────────────────┐
//! │          ConcurrentLruCache           │
//! │                                       │
//! │   get / put / remove / snapshot       │
//! │               │                       │
//! │          ┌────▼────┐                  │
//! │          │  Mutex  │                  │
//! │          └────┬────┘                  │
//! │        ┌──────▼──────┐                │
//! │        │ LRU segment │                │
//! │        │ index + list│                │
//! │        └─────────────┘                │
//! └───────────────────────────────────────┘
//! ```
//!
//! Every operation holds the lock for its whole duration, so other threads
//! never observe a node that is unlinked from the list but still indexed,
//! and recency is global: the entry evicted is the least recently used one
//! across all threads.
//!
//! # Example
//!
//! ```rust
//! use recency_cache::ConcurrentLruCache;
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentLruCache::new(NonZeroUsize::new(10_000).unwrap()));
//!
//! let handles: Vec<_> = (0..4).map(|i| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for j in 0..1000 {
//!             cache.put(format!("key-{}-{}", i, j), j);
//!         }
//!     })
//! }).collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! assert_eq!(cache.len(), 4000);
//! ```

extern crate alloc;

use crate::config::LruCacheConfig;
use crate::error::CacheError;
use crate::lru::LruSegment;
use crate::metrics::CacheMetrics;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe LRU cache.
///
/// All methods take `&self`; share the cache between threads with `Arc`.
/// Lookups return clones so the lock is released before the caller uses the
/// value. Use [`get_with`](Self::get_with) to read in place instead.
pub struct ConcurrentLruCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<LruSegment<K, V, S>>,
}

impl<K, V> ConcurrentLruCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    /// Creates a concurrent LRU cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::with_hasher(cap, DefaultHashBuilder::default())
    }
}

impl<K, V, S> ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Default + Send,
{
    /// Creates a concurrent LRU cache from a configuration with an optional hasher.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ZeroCapacity`] when the configured capacity is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recency_cache::config::LruCacheConfig;
    /// use recency_cache::ConcurrentLruCache;
    ///
    /// let cache: ConcurrentLruCache<String, i32> =
    ///     ConcurrentLruCache::init(LruCacheConfig::new(1_000), None).unwrap();
    /// assert_eq!(cache.cap().get(), 1_000);
    /// ```
    pub fn init(config: LruCacheConfig, hasher: Option<S>) -> Result<Self, CacheError> {
        let cap = config.validate()?;
        Ok(Self::with_hasher(cap, hasher.unwrap_or_default()))
    }
}

impl<K, V, S> ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    /// Creates a concurrent LRU cache with a custom hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self {
            segment: Mutex::new(LruSegment::with_hasher(cap, hash_builder)),
        }
    }

    /// Maximum number of entries.
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.lock().cap()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Retrieves a clone of the value for `key`, marking it most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Applies `f` to the value for `key` while holding the lock.
    ///
    /// Marks the key most recently used, like [`get`](Self::get), without
    /// cloning the value.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Applies `f` to a mutable reference to the value for `key`.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.segment.lock().get_mut(key).map(f)
    }

    /// Returns a clone of the value for `key` without marking it used.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().peek(key).cloned()
    }

    /// Returns `true` if `key` is cached. Does not change the recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains(key)
    }

    /// Inserts or overwrites `key`, making it the most recently used entry.
    ///
    /// Returns the evicted entry when a new key displaced the least recently
    /// used one.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.segment.lock().put(key, value)
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().remove(key)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.segment.lock().pop_lru()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    /// Clones every entry, most recently used first.
    ///
    /// The copy is taken under the lock, so it reflects one consistent state.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.segment
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K, V, S> CacheMetrics for ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentLRU"
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> core::fmt::Debug for ConcurrentLruCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let segment = self.segment.lock();
        f.debug_struct("ConcurrentLruCache")
            .field("capacity", &segment.cap())
            .field("len", &segment.len())
            .finish()
    }
}
