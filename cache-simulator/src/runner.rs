//! Simulation runner
//!
//! Replays a trace through every selected cache implementation in lock-step:
//! each request is offered to all caches before the next one is read. A miss
//! inserts the key, as a read-through cache would.
//!
//! The `lru` crate serves as the reference model. Any request on which one of
//! this crate's caches hits while the reference misses (or the reverse) is a
//! divergence from strict LRU and is reported in the result.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::time::Instant;

use anyhow::Result;
use recency_cache::config::LruCacheConfig;
use recency_cache::{ConcurrentLruCache, LruCache};

use crate::input::LogReader;
use crate::models::{CacheImpl, Divergence, Request, SimulationConfig, SimulationResult};
use crate::stats::SimulationStats;

/// Outcome of offering one request to a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Hit,
    Miss { evicted: bool },
}

/// Wrapper enum for the replayed implementations
enum CacheWrapper {
    Reference(lru::LruCache<String, u64>),
    Sequential(LruCache<String, u64>),
    Concurrent(ConcurrentLruCache<String, u64>),
}

impl CacheWrapper {
    fn create(implementation: CacheImpl, capacity: NonZeroUsize) -> Self {
        match implementation {
            CacheImpl::Reference => CacheWrapper::Reference(lru::LruCache::new(capacity)),
            CacheImpl::Sequential => CacheWrapper::Sequential(LruCache::new(capacity)),
            CacheImpl::Concurrent => CacheWrapper::Concurrent(ConcurrentLruCache::new(capacity)),
        }
    }

    /// Looks the key up and inserts it on a miss
    fn access(&mut self, request: &Request) -> Access {
        match self {
            CacheWrapper::Reference(cache) => {
                if cache.get(&request.key).is_some() {
                    Access::Hit
                } else {
                    // `push` on an absent key only returns an entry when it evicted one
                    let evicted = cache.push(request.key.clone(), request.timestamp);
                    Access::Miss {
                        evicted: evicted.is_some(),
                    }
                }
            }
            CacheWrapper::Sequential(cache) => {
                if cache.get(&request.key).is_some() {
                    Access::Hit
                } else {
                    let evicted = cache.put(request.key.clone(), request.timestamp);
                    Access::Miss {
                        evicted: evicted.is_some(),
                    }
                }
            }
            CacheWrapper::Concurrent(cache) => {
                if cache.get(&request.key).is_some() {
                    Access::Hit
                } else {
                    let evicted = cache.put(request.key.clone(), request.timestamp);
                    Access::Miss {
                        evicted: evicted.is_some(),
                    }
                }
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            CacheWrapper::Reference(cache) => cache.len(),
            CacheWrapper::Sequential(cache) => cache.len(),
            CacheWrapper::Concurrent(cache) => cache.len(),
        }
    }
}

/// Runner for cache simulations
pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    /// Create a new simulation runner
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Implementations to replay, reference first and without duplicates
    fn implementations(&self) -> Vec<CacheImpl> {
        let mut implementations = self.config.implementations.clone();
        implementations.push(CacheImpl::Reference);
        implementations.sort();
        implementations.dedup();
        implementations
    }

    /// Run the simulation over every trace file in the input directory
    pub fn run(&self) -> Result<SimulationResult> {
        let capacity = LruCacheConfig::new(self.config.capacity).validate()?;
        let implementations = self.implementations();

        tracing::info!(
            input = %self.config.input_dir.display(),
            capacity = capacity.get(),
            implementations = ?implementations,
            "starting simulation"
        );

        let mut caches: Vec<(CacheImpl, CacheWrapper)> = implementations
            .iter()
            .map(|&implementation| (implementation, CacheWrapper::create(implementation, capacity)))
            .collect();
        let mut stats = SimulationStats::new(&implementations);
        let mut unique_keys: HashSet<String> = HashSet::new();
        let mut divergence: Option<Divergence> = None;
        let mut request_index = 0usize;

        let start_time = Instant::now();
        let reader = LogReader::new(&self.config.input_dir);
        let total_requests = reader.for_each_request(|request| {
            let mut reference_hit = None;

            for (implementation, cache) in caches.iter_mut() {
                let op_start = Instant::now();
                let access = cache.access(&request);
                stats.record_time(*implementation, op_start.elapsed().as_nanos() as u64);

                let hit = match access {
                    Access::Hit => {
                        stats.record_hit(*implementation);
                        true
                    }
                    Access::Miss { evicted } => {
                        stats.record_miss(*implementation, evicted);
                        false
                    }
                };

                match reference_hit {
                    // The reference sorts first, so it sets the expectation
                    None => reference_hit = Some(hit),
                    Some(expected) if expected != hit && divergence.is_none() => {
                        tracing::warn!(
                            implementation = %implementation,
                            request_index,
                            key = %request.key,
                            "implementation diverged from reference LRU"
                        );
                        divergence = Some(Divergence {
                            request_index,
                            key: request.key.clone(),
                            implementation: *implementation,
                            reference_hit: expected,
                        });
                    }
                    Some(_) => {}
                }
            }

            unique_keys.insert(request.key);
            request_index += 1;

            if request_index % 1_000_000 == 0 {
                tracing::info!(requests = request_index, "replay progress");
            }
        })?;

        for (implementation, cache) in &caches {
            stats.record_final_len(*implementation, cache.len());
        }

        let duration = start_time.elapsed();
        tracing::info!(
            requests = total_requests,
            unique_keys = unique_keys.len(),
            elapsed = ?duration,
            "simulation finished"
        );

        Ok(SimulationResult {
            stats: stats.into_stats(),
            total_requests,
            unique_keys: unique_keys.len(),
            duration,
            capacity: capacity.get(),
            divergence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{TraceConfig, TraceGenerator};
    use std::collections::BTreeMap;
    use std::fs;

    /// Hit and miss counts per implementation for an in-memory trace
    fn replay(requests: &[Request], capacity: NonZeroUsize) -> BTreeMap<CacheImpl, (usize, usize)> {
        let mut results = BTreeMap::new();
        for implementation in CacheImpl::all() {
            let mut cache = CacheWrapper::create(implementation, capacity);
            let hits = requests
                .iter()
                .filter(|request| cache.access(request) == Access::Hit)
                .count();
            results.insert(implementation, (hits, requests.len() - hits));
        }
        results
    }

    fn requests(keys: &[&str]) -> Vec<Request> {
        keys.iter()
            .enumerate()
            .map(|(i, key)| Request::new(i as u64, *key))
            .collect()
    }

    #[test]
    fn test_replay_counts_hits() {
        let trace = requests(&["a", "b", "a", "c", "b", "a"]);
        let results = replay(&trace, NonZeroUsize::new(2).unwrap());

        // a b | a hit | c evicts b | b misses, evicts a | a misses
        for (hits, misses) in results.values() {
            assert_eq!((*hits, *misses), (1, 5));
        }
    }

    #[test]
    fn test_implementations_agree_on_generated_trace() {
        let dir = std::env::temp_dir().join("recency_runner_test_agree");
        let _ = fs::remove_dir_all(&dir);
        TraceGenerator::new(TraceConfig {
            requests: 20_000,
            keys: 2_000,
            scan_percent: 5,
            scan_length: 300,
            seed: Some(11),
            output_dir: dir.clone(),
            ..TraceConfig::default()
        })
        .generate()
        .unwrap();

        let result = SimulationRunner::new(SimulationConfig {
            input_dir: dir.clone(),
            capacity: 250,
            implementations: vec![CacheImpl::Sequential, CacheImpl::Concurrent],
        })
        .run()
        .unwrap();

        assert_eq!(result.divergence, None);
        assert_eq!(result.total_requests, 20_000);
        assert_eq!(result.stats.len(), 3);

        let reference = &result.stats[&CacheImpl::Reference];
        for stats in result.stats.values() {
            assert_eq!(stats.hits, reference.hits);
            assert_eq!(stats.evictions, reference.evictions);
            assert_eq!(stats.final_len, 250);
        }

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = SimulationRunner::new(SimulationConfig {
            input_dir: std::env::temp_dir(),
            capacity: 0,
            implementations: vec![CacheImpl::Sequential],
        })
        .run();
        assert!(result.is_err());
    }
}
