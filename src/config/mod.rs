//! Cache Configuration Module
//!
//! Configuration structs have public fields for simple instantiation and are
//! validated when a cache is built from them, so an invalid value never
//! produces a half-initialized cache.
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | `LruCacheConfig` | [`LruCache`](crate::LruCache) | Least Recently Used |
//!
//! The thread-safe `ConcurrentLruCache` (feature
//! `concurrent`) is built from the same `LruCacheConfig`: it wraps a single
//! LRU behind one lock, so there is nothing extra to configure.

pub mod lru;

pub use lru::LruCacheConfig;
