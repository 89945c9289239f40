//! Configuration for the Least Recently Used (LRU) cache.
//!
//! The only tunable is the entry capacity. It is taken as a plain `usize`
//! so that configurations can be built from untrusted input (CLI flags,
//! environment, config files) and validated once, at construction time.
//! A capacity of zero is rejected rather than clamped.
//!
//! # Examples
//!
//! ```
//! use recency_cache::config::LruCacheConfig;
//! use recency_cache::LruCache;
//!
//! let config = LruCacheConfig { capacity: 10_000 };
//! let cache: LruCache<String, Vec<u8>> = LruCache::init(config, None).unwrap();
//! assert_eq!(cache.cap().get(), 10_000);
//!
//! let config = LruCacheConfig { capacity: 0 };
//! assert!(LruCache::<String, i32>::init(config, None).is_err());
//! ```

use crate::error::CacheError;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache can hold. Must be
///   greater than zero; checked by [`LruCacheConfig::validate`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: usize,
}

impl LruCacheConfig {
    /// Creates a configuration with the given entry capacity.
    ///
    /// The capacity is not checked here; see [`LruCacheConfig::validate`].
    #[inline]
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Checks the configuration and returns the capacity as a `NonZeroUsize`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ZeroCapacity`] when `capacity` is zero.
    pub fn validate(&self) -> Result<NonZeroUsize, CacheError> {
        NonZeroUsize::new(self.capacity).ok_or(CacheError::ZeroCapacity)
    }
}

impl From<NonZeroUsize> for LruCacheConfig {
    fn from(capacity: NonZeroUsize) -> Self {
        Self::new(capacity.get())
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
