//! Concurrent Cache Correctness Tests
//!
//! These tests validate that the concurrent cache keeps exact LRU eviction
//! semantics while being accessed from multiple threads.
//!
//! ## Test Strategy
//!
//! Unlike stress tests that focus on throughput and lack of panics, these tests:
//! - Use small cache sizes for predictable behavior
//! - Verify that eviction order is global, not per-thread
//! - Verify that invariants hold after concurrent mutation
//!
//! ## Segments
//!
//! 1. **Algorithm Correctness**: eviction behavior matches the single-threaded cache
//! 2. **Thread Safety Invariants**: cache state stays consistent under concurrency

#![cfg(feature = "concurrent")]

use recency_cache::config::LruCacheConfig;
use recency_cache::metrics::CacheMetrics;
use recency_cache::{CacheError, ConcurrentLruCache, LruCache};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn make_cache<K, V>(cap: usize) -> ConcurrentLruCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    ConcurrentLruCache::new(NonZeroUsize::new(cap).unwrap())
}

// ============================================================================
// SEGMENT 1: ALGORITHM CORRECTNESS UNDER CONCURRENCY
// ============================================================================

#[test]
fn test_concurrent_lru_basic_eviction() {
    let cache = make_cache(3);

    cache.put(1, 10);
    cache.put(2, 20);
    cache.put(3, 30);
    assert_eq!(cache.get(&1), Some(10));

    // 2 is the least recently used entry across the whole cache
    assert_eq!(cache.put(4, 40), Some((2, 20)));
    assert!(!cache.contains(&2));
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_concurrent_lru_recency_is_global_across_threads() {
    let cache: Arc<ConcurrentLruCache<i32, i32>> = Arc::new(make_cache(4));
    for k in 0..4 {
        cache.put(k, k);
    }

    // Touch keys 0 and 1 from another thread
    {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            cache.get(&0);
            cache.get(&1);
        })
        .join()
        .unwrap();
    }

    // Inserts from this thread evict the keys the other thread did not touch
    assert_eq!(cache.put(10, 10), Some((2, 2)));
    assert_eq!(cache.put(11, 11), Some((3, 3)));
    assert!(cache.contains(&0));
    assert!(cache.contains(&1));
}

#[test]
fn test_concurrent_lru_matches_single_threaded_cache() {
    let concurrent = make_cache(5);
    let mut plain = LruCache::new(NonZeroUsize::new(5).unwrap());

    for i in 0..500u32 {
        let key = (i * 7) % 13;
        if i % 3 == 0 {
            assert_eq!(concurrent.get(&key), plain.get(&key).copied());
        } else {
            assert_eq!(concurrent.put(key, i), plain.put(key, i));
        }
    }

    let plain_entries: Vec<_> = plain.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(concurrent.snapshot(), plain_entries);
}

#[test]
fn test_concurrent_lru_peek_does_not_promote() {
    let cache = make_cache(2);
    cache.put("a", 1);
    cache.put("b", 2);

    assert_eq!(cache.peek(&"a"), Some(1));
    assert_eq!(cache.put("c", 3), Some(("a", 1)));
}

#[test]
fn test_concurrent_lru_get_with_and_get_mut_with() {
    let cache: ConcurrentLruCache<&str, Vec<u32>> = make_cache(2);
    cache.put("a", vec![1, 2, 3]);
    cache.put("b", vec![]);

    assert_eq!(cache.get_with(&"a", |v| v.len()), Some(3));
    assert_eq!(cache.get_mut_with(&"b", |v| v.push(9)), Some(()));
    assert_eq!(cache.get(&"b"), Some(vec![9]));
    assert_eq!(cache.get_with(&"missing", |v| v.len()), None);

    // "b" was used last, so "a" goes
    assert_eq!(cache.put("c", vec![]), Some(("a", vec![1, 2, 3])));
}

#[test]
fn test_concurrent_lru_remove_pop_clear() {
    let cache = make_cache(3);
    cache.put(1, 1);
    cache.put(2, 2);
    cache.put(3, 3);

    assert_eq!(cache.remove(&2), Some(2));
    assert_eq!(cache.pop_lru(), Some((1, 1)));
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.get(&3), None);
}

#[test]
fn test_concurrent_lru_zero_capacity_rejected() {
    let result: Result<ConcurrentLruCache<u32, u32>, _> =
        ConcurrentLruCache::init(LruCacheConfig::new(0), None);
    assert_eq!(result.unwrap_err(), CacheError::ZeroCapacity);
}

// ============================================================================
// SEGMENT 2: THREAD SAFETY INVARIANTS
// ============================================================================

#[test]
fn test_concurrent_lru_len_bounded_under_contention() {
    let cache: Arc<ConcurrentLruCache<usize, usize>> = Arc::new(make_cache(64));
    let num_threads = 8;
    let ops_per_thread = 2_000;

    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = (t * 31 + i) % 256;
                    if i % 2 == 0 {
                        cache.put(key, i);
                    } else {
                        cache.get(&key);
                    }
                    assert!(cache.len() <= 64);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 64);
    let snapshot = cache.snapshot();
    assert_eq!(snapshot.len(), cache.len());

    let mut keys: Vec<_> = snapshot.iter().map(|(k, _)| *k).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), snapshot.len(), "snapshot holds duplicate keys");
}

#[test]
fn test_concurrent_lru_every_put_is_accounted_for() {
    let cache: Arc<ConcurrentLruCache<usize, usize>> = Arc::new(make_cache(100));
    let evicted = Arc::new(AtomicUsize::new(0));
    let num_threads = 4;
    let puts_per_thread = 500;

    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let evicted = Arc::clone(&evicted);
            thread::spawn(move || {
                for i in 0..puts_per_thread {
                    if cache.put(t * puts_per_thread + i, i).is_some() {
                        evicted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // All keys are distinct: each put either stays or evicted exactly one entry
    let total = num_threads * puts_per_thread;
    assert_eq!(cache.len() + evicted.load(Ordering::Relaxed), total);
    assert_eq!(cache.len(), 100);

    let metrics = cache.metrics();
    assert_eq!(metrics["insertions"], total as f64);
    assert_eq!(metrics["evictions"], (total - 100) as f64);
    assert_eq!(cache.algorithm_name(), "ConcurrentLRU");
}

#[test]
fn test_concurrent_lru_scoped_workers() {
    let cache: ConcurrentLruCache<u32, u32> = make_cache(16);
    let mut pool = scoped_threadpool::Pool::new(4);

    pool.scoped(|scope| {
        for worker in 0..4u32 {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..1_000u32 {
                    let key = worker * 1_000 + (i % 32);
                    cache.put(key, i);
                    let _ = cache.get(&key);
                }
            });
        }
    });

    assert_eq!(cache.len(), 16);
    assert!(cache.snapshot().iter().all(|(k, _)| cache.contains(k)));
}
