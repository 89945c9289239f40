//! Least Recently Used (LRU) Cache Implementation
//!
//! This module provides a fixed-capacity LRU cache with O(1) amortized `get`
//! and `put`. LRU works on the principle of temporal locality: items that
//! have been accessed recently are likely to be accessed again soon, so the
//! item that has gone longest without an access is the one evicted.
//!
//! # Structure
//!
//! Two structures cooperate:
//!
//! - **Index**: a hash map from key to a slot handle into the recency list.
//! - **Recency list**: an arena-backed doubly linked list that owns every
//!   entry, ordered from most recently used (front) to least recently used
//!   (back).
//!
//! ```text
//!   Index (key -> handle)        Recency list (owns the entries)
//!   ┌─────┬────────┐
//!   │ "a" │ slot 1 │             front                        back
//!   │ "b" │ slot 0 │               │                            │
//!   │ "c" │ slot 2 │               ▼                            ▼
//!   └─────┴────────┘           slot 1 ◀──▶ slot 2 ◀──▶ slot 0
//!                              ("a",1)     ("c",3)     ("b",2)
//! ```
//!
//! The index stores the same handle the arena uses, so the two can never
//! point at different nodes. Every mutating operation updates both in the
//! same call; `index.len() == list.len() <= capacity` holds between calls.
//!
//! # Performance Characteristics
//!
//! - Get / Put / Remove: O(1) expected (hash lookup plus constant relinking)
//! - Space: O(capacity); slot storage is reserved at construction and freed
//!   slots are recycled, so a full cache never reallocates
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. For concurrent access, wrap it in
//! a lock or use `ConcurrentLruCache` (feature
//! `concurrent`), which holds one lock around a single cache.

extern crate alloc;

use crate::config::LruCacheConfig;
use crate::error::CacheError;
use crate::list::{self, Handle, List};
use crate::metrics::{CacheMetrics, LruCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Internal LRU segment containing the actual cache algorithm.
///
/// Shared between `LruCache` (single-threaded) and `ConcurrentLruCache`
/// (one lock around one segment), so the algorithm lives in one place.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    list: List<(K, V)>,
    map: HashMap<K, Handle, S>,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    pub(crate) fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        tracing::debug!(capacity = cap.get(), "creating LRU cache");
        LruSegment {
            list: List::new(cap),
            map: HashMap::with_capacity_and_hasher(cap.get(), hash_builder),
            metrics: LruCacheMetrics::new(cap.get() as u64),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.list.cap()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.list.is_full()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }

    /// Index and list must describe the same set of entries.
    #[inline]
    fn debug_check(&self) {
        debug_assert_eq!(
            self.map.len(),
            self.list.len(),
            "LRU index and recency list disagree on entry count"
        );
        debug_assert!(
            self.list.len() <= self.list.cap().get(),
            "LRU cache holds more entries than its capacity"
        );
    }

    /// Looks up `key`, promotes it on a hit, and records the lookup.
    fn touch<Q>(&mut self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key).copied() {
            Some(handle) => {
                self.list.move_to_front(handle);
                self.metrics.core.record_hit();
                Some(handle)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.touch(key)?;
        self.list.get_value(handle).map(|(_, v)| v)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.touch(key)?;
        self.list.get_value_mut(handle).map(|(_, v)| v)
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.map.get(key).copied()?;
        self.list.get_value(handle).map(|(_, v)| v)
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub(crate) fn peek_lru(&self) -> Option<(&K, &V)> {
        let handle = self.list.back()?;
        self.list.get_value(handle).map(|(k, v)| (k, v))
    }

    pub(crate) fn peek_mru(&self) -> Option<(&K, &V)> {
        let handle = self.list.front()?;
        self.list.get_value(handle).map(|(k, v)| (k, v))
    }

    /// Unlinks the back entry from both the list and the index.
    fn take_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.remove_last()?;
        let indexed = self.map.remove(&key);
        debug_assert!(indexed.is_some(), "LRU entry missing from index");
        Some((key, value))
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if let Some(handle) = self.map.get(&key).copied() {
            self.list.move_to_front(handle);
            // The stored key stays; it is the same copy the index holds
            let entry = self.list.get_value_mut(handle);
            debug_assert!(entry.is_some(), "indexed handle not live in recency list");
            if let Some((_, stored)) = entry {
                *stored = value;
            }
            self.metrics.core.record_update();
            self.debug_check();
            return None;
        }

        let evicted = if self.list.is_full() {
            let evicted = self.take_lru();
            if evicted.is_some() {
                self.metrics.core.record_eviction();
                tracing::trace!(
                    len = self.list.len(),
                    capacity = self.list.cap().get(),
                    "evicted least recently used entry"
                );
            }
            evicted
        } else {
            None
        };

        match self.list.add((key.clone(), value)) {
            Ok(handle) => {
                self.map.insert(key, handle);
                self.metrics.core.record_insertion();
            }
            Err(_) => debug_assert!(false, "no room in recency list after eviction"),
        }

        self.debug_check();
        evicted
    }

    pub(crate) fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.take_lru()?;
        self.metrics.core.record_removal();
        self.debug_check();
        Some(entry)
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.map.remove(key)?;
        let (_, value) = self.list.remove(handle)?;
        self.metrics.core.record_removal();
        self.debug_check();
        Some(value)
    }

    pub(crate) fn clear(&mut self) {
        tracing::debug!(dropped = self.map.len(), "clearing LRU cache");
        self.map.clear();
        self.list.clear();
        self.metrics.core.record_clear();
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    #[cfg(test)]
    pub(crate) fn check_consistency(&self) {
        self.list.check_links();
        assert_eq!(self.map.len(), self.list.len());
        for (key, _) in self.list.iter() {
            let handle = self.map.get(key).copied().expect("list key not indexed");
            let (indexed_key, _) = self.list.get_value(handle).expect("stale handle");
            assert!(indexed_key == key, "index points at a different node");
        }
    }
}

impl<K, V, S> fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.list.cap())
            .field("len", &self.list.len())
            .finish()
    }
}

/// An implementation of a Least Recently Used (LRU) cache.
///
/// The cache has a fixed capacity and supports O(1) operations for
/// inserting, retrieving, and updating entries. When the cache is full, the
/// least recently used entry is evicted to make room for a new key.
///
/// `get`, `get_mut` and `put` count as uses. `peek`, `contains` and
/// iteration do not change the recency order.
///
/// # Examples
///
/// ```
/// use recency_cache::LruCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.put("apple", 1);
/// cache.put("banana", 2);
///
/// // Accessing items updates their recency
/// assert_eq!(cache.get(&"apple"), Some(&1));
///
/// // Adding beyond capacity evicts the least recently used item
/// assert_eq!(cache.put("cherry", 3), Some(("banana", 2)));
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.get(&"apple"), Some(&1));
/// assert_eq!(cache.get(&"cherry"), Some(&3));
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: LruSegment<K, V, S>,
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.segment.list.cap())
            .field("len", &self.segment.list.len())
            .finish()
    }
}

impl<K: Hash + Eq, V> LruCache<K, V, DefaultHashBuilder> {
    /// Creates a new LRU cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new LRU cache from an unchecked capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ZeroCapacity`] when `cap` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use recency_cache::{CacheError, LruCache};
    ///
    /// let cache: LruCache<u32, u32> = LruCache::try_new(8).unwrap();
    /// assert_eq!(cache.cap().get(), 8);
    ///
    /// assert_eq!(
    ///     LruCache::<u32, u32>::try_new(0).unwrap_err(),
    ///     CacheError::ZeroCapacity
    /// );
    /// ```
    pub fn try_new(cap: usize) -> Result<Self, CacheError> {
        Self::init(LruCacheConfig::new(cap), None)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> LruCache<K, V, S> {
    /// Creates a new LRU cache from a configuration with an optional hasher.
    ///
    /// When `hasher` is `None` the hasher type's `Default` is used.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ZeroCapacity`] when the configured capacity is zero.
    pub fn init(config: LruCacheConfig, hasher: Option<S>) -> Result<Self, CacheError> {
        let cap = config.validate()?;
        Ok(Self::with_hasher(cap, hasher.unwrap_or_default()))
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a new LRU cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self {
            segment: LruSegment::with_hasher(cap, hash_builder),
        }
    }

    /// Maximum number of entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.cap()
    }

    /// Number of entries currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns true if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns true if the next `put` of a new key will evict.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.segment.is_full()
    }

    /// Returns a reference to the value for `key` and marks it most recently used.
    ///
    /// A miss returns `None` and leaves the recency order untouched.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Like [`get`](Self::get), but returns a mutable reference.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns a reference to the value for `key` without marking it used.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns true if `key` is cached. Does not change the recency order.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// The entry that would be evicted next.
    #[inline]
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.segment.peek_lru()
    }

    /// The most recently used entry.
    #[inline]
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.segment.peek_mru()
    }

    /// Removes and returns the least recently used entry.
    #[inline]
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        self.segment.pop_lru()
    }

    /// Removes `key` and returns its value.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes every entry. The capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Iterates over the entries from most to least recently used.
    ///
    /// Iteration is read-only and does not change the recency order. Use
    /// `.rev()` to walk from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.segment.iter()
    }

    /// Iterates over the keys from most to least recently used.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    #[cfg(test)]
    pub(crate) fn check_consistency(&self) {
        self.segment.check_consistency();
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Inserts or overwrites `key`, making it the most recently used entry.
    ///
    /// Overwriting an existing key keeps the entry count unchanged and
    /// returns `None`. Inserting a new key into a full cache evicts the least
    /// recently used entry and returns it.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> Extend<(K, V)> for LruCache<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> IntoIterator for &'a LruCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

/// Iterator over the entries of an [`LruCache`], most recently used first.
pub struct Iter<'a, K, V> {
    inner: list::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

/// Iterator over the keys of an [`LruCache`], most recently used first.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys")
            .field("remaining", &self.inner.len())
            .finish()
    }
}
