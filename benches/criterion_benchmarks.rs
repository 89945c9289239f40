use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recency_cache::config::LruCacheConfig;
use recency_cache::LruCache;
use std::num::NonZeroUsize;

const CACHE_SIZE: usize = 1000;
const NUM_OPERATIONS: usize = 10_000;

fn make_lru<K: std::hash::Hash + Eq + Clone, V>(cap: usize) -> LruCache<K, V> {
    LruCache::init(LruCacheConfig::new(cap), None).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cache Operations");

    {
        let mut cache = make_lru(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        group.bench_function("LRU get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function("LRU get miss", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i + CACHE_SIZE)));
                }
            });
        });

        group.bench_function("LRU peek", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.peek(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function("LRU put existing", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put(i % CACHE_SIZE, i));
                }
            });
        });
    }

    {
        let mut cache = make_lru(CACHE_SIZE);
        let mut next = 0usize;

        group.bench_function("LRU put evicting", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.put(next, next));
                    next += 1;
                }
            });
        });
    }

    // Reference point: the `lru` crate with the same workload
    {
        let mut cache = lru::LruCache::new(NonZeroUsize::new(CACHE_SIZE).unwrap());
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        group.bench_function("lru crate get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });
    }

    group.finish();
}

/// Mixed get/put workloads over a key space larger than the cache.
pub fn workload_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mixed Workload");
    group.throughput(Throughput::Elements(NUM_OPERATIONS as u64));

    for key_space in [CACHE_SIZE / 2, CACHE_SIZE * 2, CACHE_SIZE * 10] {
        let mut rng = StdRng::seed_from_u64(42);
        let keys: Vec<usize> = (0..NUM_OPERATIONS)
            .map(|_| rng.gen_range(0..key_space))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("recency-cache", key_space),
            &keys,
            |b, keys| {
                b.iter(|| {
                    let mut cache = make_lru(CACHE_SIZE);
                    for &key in keys {
                        if cache.get(&key).is_none() {
                            cache.put(key, key);
                        }
                    }
                    black_box(cache.len())
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("lru crate", key_space), &keys, |b, keys| {
            b.iter(|| {
                let mut cache = lru::LruCache::new(NonZeroUsize::new(CACHE_SIZE).unwrap());
                for &key in keys {
                    if cache.get(&key).is_none() {
                        cache.put(key, key);
                    }
                }
                black_box(cache.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark, workload_benchmark);
criterion_main!(benches);
