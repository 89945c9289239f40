//! Synthetic trace generation
//!
//! Produces request traces that mix three access patterns:
//!
//! - **hot set**: a small share of keys receiving most of the traffic
//! - **uniform**: any key, equally likely
//! - **scan**: a run of consecutive cold keys, each touched once, which is
//!   the pattern that flushes an LRU cache
//!
//! Traces are CSV files with a `timestamp,key` header, split across one or
//! more files so they can be replayed as a directory.

use crate::models::Request;
use anyhow::{ensure, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Parameters for generating a request trace
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Total number of requests
    pub requests: u64,
    /// Number of distinct keys
    pub keys: u32,
    /// Percentage of keys in the hot set
    pub hot_keys_percent: u8,
    /// Percentage of requests directed at the hot set
    pub hot_traffic_percent: u8,
    /// Percentage of requests that start a scan
    pub scan_percent: u8,
    /// Number of consecutive keys touched by one scan
    pub scan_length: u32,
    /// Requests per second, used to space timestamps
    pub rps: u32,
    /// Number of output files the trace is split across
    pub files: u32,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Output directory
    pub output_dir: PathBuf,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            requests: 100_000,
            keys: 10_000,
            hot_keys_percent: 20,
            hot_traffic_percent: 80,
            scan_percent: 0,
            scan_length: 100,
            rps: 100,
            files: 1,
            seed: None,
            output_dir: PathBuf::from("traces"),
        }
    }
}

impl TraceConfig {
    fn validate(&self) -> Result<()> {
        ensure!(self.keys > 0, "key count must be greater than zero");
        ensure!(self.files > 0, "file count must be greater than zero");
        ensure!(self.rps > 0, "requests per second must be greater than zero");
        ensure!(
            self.hot_keys_percent <= 100
                && self.hot_traffic_percent <= 100
                && self.scan_percent <= 100,
            "percentages must be between 0 and 100"
        );
        ensure!(
            u32::from(self.hot_traffic_percent) + u32::from(self.scan_percent) <= 100,
            "hot traffic and scan percentages together exceed 100"
        );
        Ok(())
    }
}

/// Key selection state carried across requests
struct KeyPicker {
    rng: StdRng,
    keys: u32,
    hot_keys: u32,
    hot_probability: f64,
    scan_probability: f64,
    scan_length: u32,
    /// Next key and remaining length of the scan in progress
    scan: Option<(u32, u32)>,
}

impl KeyPicker {
    fn new(config: &TraceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let hot_keys =
            ((u64::from(config.keys) * u64::from(config.hot_keys_percent)) / 100).max(1) as u32;

        Self {
            rng,
            keys: config.keys,
            hot_keys: hot_keys.min(config.keys),
            hot_probability: f64::from(config.hot_traffic_percent) / 100.0,
            scan_probability: f64::from(config.scan_percent) / 100.0,
            scan_length: config.scan_length.max(1),
            scan: None,
        }
    }

    fn next_key(&mut self) -> u32 {
        if let Some((next, remaining)) = self.scan {
            self.scan = if remaining > 1 {
                Some(((next + 1) % self.keys, remaining - 1))
            } else {
                None
            };
            return next;
        }

        let roll = self.rng.gen::<f64>();
        if roll < self.hot_probability {
            self.rng.gen_range(0..self.hot_keys)
        } else if roll < self.hot_probability + self.scan_probability {
            // Scans walk the cold part of the key space
            let cold = self.keys - self.hot_keys;
            let start = if cold > 0 {
                self.hot_keys + self.rng.gen_range(0..cold)
            } else {
                0
            };
            self.scan = if self.scan_length > 1 {
                Some(((start + 1) % self.keys, self.scan_length - 1))
            } else {
                None
            };
            start
        } else {
            self.rng.gen_range(0..self.keys)
        }
    }
}

/// Generator for synthetic request traces
pub struct TraceGenerator {
    config: TraceConfig,
}

impl TraceGenerator {
    /// Create a new generator with the given configuration
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    /// Writes the trace and returns the paths of the files created
    pub fn generate(&self) -> Result<Vec<PathBuf>> {
        self.config.validate()?;
        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                self.config.output_dir.display()
            )
        })?;

        let start_time = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let mut picker = KeyPicker::new(&self.config);

        tracing::info!(
            requests = self.config.requests,
            keys = self.config.keys,
            hot_keys = picker.hot_keys,
            hot_traffic_percent = self.config.hot_traffic_percent,
            scan_percent = self.config.scan_percent,
            output = %self.config.output_dir.display(),
            "generating trace"
        );

        let files = u64::from(self.config.files);
        let per_file = self.config.requests / files;
        let remainder = self.config.requests % files;

        let mut paths = Vec::with_capacity(self.config.files as usize);
        let mut index = 0u64;
        for file_no in 0..files {
            let path = self
                .config
                .output_dir
                .join(format!("trace_{file_no:03}.csv"));
            let file =
                File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = csv::Writer::from_writer(BufWriter::new(file));

            let count = per_file + u64::from(file_no < remainder);
            for _ in 0..count {
                let timestamp = start_time + index / u64::from(self.config.rps);
                let request = Request::new(timestamp, format!("key_{}", picker.next_key()));
                writer.serialize(&request)?;
                index += 1;
            }
            writer.flush()?;

            tracing::debug!(file = %path.display(), requests = count, "trace file written");
            paths.push(path);
        }

        Ok(paths)
    }
}
