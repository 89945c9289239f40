// Statistics collection and reporting for cache simulation

use crate::models::{CacheImpl, CsvResultRow, ImplStats, SimulationResult};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Collects statistics for each replayed implementation
pub struct SimulationStats {
    stats: BTreeMap<CacheImpl, ImplStats>,
}

impl SimulationStats {
    /// Create a new statistics collector for the given implementations
    pub fn new(implementations: &[CacheImpl]) -> Self {
        let stats = implementations
            .iter()
            .map(|&implementation| (implementation, ImplStats::new()))
            .collect();
        Self { stats }
    }

    /// Record a cache hit
    pub fn record_hit(&mut self, implementation: CacheImpl) {
        if let Some(stats) = self.stats.get_mut(&implementation) {
            stats.hits += 1;
        }
    }

    /// Record a cache miss, and the eviction it caused if any
    pub fn record_miss(&mut self, implementation: CacheImpl, evicted: bool) {
        if let Some(stats) = self.stats.get_mut(&implementation) {
            stats.misses += 1;
            if evicted {
                stats.evictions += 1;
            }
        }
    }

    /// Add time spent inside one cache operation
    pub fn record_time(&mut self, implementation: CacheImpl, elapsed_ns: u64) {
        if let Some(stats) = self.stats.get_mut(&implementation) {
            stats.op_time_ns += elapsed_ns;
        }
    }

    /// Record how many entries the cache held at the end of the replay
    pub fn record_final_len(&mut self, implementation: CacheImpl, len: usize) {
        if let Some(stats) = self.stats.get_mut(&implementation) {
            stats.final_len = len;
        }
    }

    /// Consume the collector, returning the per-implementation statistics
    pub fn into_stats(self) -> BTreeMap<CacheImpl, ImplStats> {
        self.stats
    }
}

/// Print a summary report of the simulation results
pub fn print_summary(result: &SimulationResult) {
    println!("\nCache Simulation Summary");
    println!("========================");
    println!("Total requests: {}", result.total_requests);
    println!("Unique keys:    {}", result.unique_keys);
    println!("Capacity:       {} entries", result.capacity);
    println!("Elapsed:        {:.2?}", result.duration);

    println!(
        "\n{:<20} {:>10} {:>10} {:>10} {:>8} {:>10} {:>12}",
        "Implementation", "Hits", "Misses", "Evictions", "HitRate", "AvgNs", "Ops/sec"
    );
    println!("{}", "-".repeat(86));

    for (implementation, stats) in &result.stats {
        println!(
            "{:<20} {:>10} {:>10} {:>10} {:>7.2}% {:>10.0} {:>12.0}",
            implementation.as_str(),
            stats.hits,
            stats.misses,
            stats.evictions,
            stats.hit_rate(),
            stats.avg_ns(),
            stats.ops_per_sec(),
        );
    }

    match &result.divergence {
        Some(divergence) => println!("\nDIVERGENCE: {divergence}"),
        None => println!("\nAll implementations matched the reference LRU model."),
    }
}

/// Export results to a CSV file
pub fn export_csv(result: &SimulationResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for (implementation, stats) in &result.stats {
        writer.serialize(CsvResultRow {
            implementation: implementation.as_str().to_string(),
            capacity: result.capacity,
            requests: stats.hits + stats.misses,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            hit_rate: stats.hit_rate(),
            final_len: stats.final_len,
            op_time_ns: stats.op_time_ns,
            avg_ns: stats.avg_ns(),
            ops_per_sec: stats.ops_per_sec(),
        })?;
    }

    writer.flush()?;
    Ok(())
}
