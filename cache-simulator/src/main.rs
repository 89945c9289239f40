use anyhow::{bail, Context, Result};
use cache_simulator::generator::{TraceConfig, TraceGenerator};
use cache_simulator::models::{CacheImpl, SimulationConfig};
use cache_simulator::runner::SimulationRunner;
use cache_simulator::stats;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Trace generator and LRU replay simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay traces through the caches and compare against the reference LRU
    Simulate {
        /// Directory containing trace files
        #[arg(short, long, value_name = "DIR")]
        input_dir: PathBuf,

        /// Cache capacity (number of entries)
        #[arg(short, long, default_value = "10000")]
        capacity: usize,

        /// Implementations to replay (sequential, concurrent); the reference
        /// model always runs
        #[arg(long, value_name = "IMPLS", num_args = 1.., value_delimiter = ',')]
        implementations: Option<Vec<String>>,

        /// Export results to CSV file
        #[arg(long, value_name = "PATH")]
        output_csv: Option<PathBuf>,
    },

    /// Generate a synthetic request trace
    Generate {
        /// Total number of requests
        #[arg(long, default_value = "100000")]
        requests: u64,

        /// Number of distinct keys
        #[arg(long, default_value = "10000")]
        keys: u32,

        /// Percentage of keys in the hot set
        #[arg(long, default_value = "20")]
        hot_keys: u8,

        /// Percentage of requests aimed at the hot set
        #[arg(long, default_value = "80")]
        hot_traffic: u8,

        /// Percentage of requests that start a sequential scan
        #[arg(long, default_value = "0")]
        scan: u8,

        /// Keys touched by each scan
        #[arg(long, default_value = "100")]
        scan_length: u32,

        /// Requests per second, used to space timestamps
        #[arg(long, default_value = "100")]
        rps: u32,

        /// Number of files to split the trace across
        #[arg(long, default_value = "1")]
        files: u32,

        /// Seed for a reproducible trace
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory
        #[arg(short, long, default_value = "traces")]
        output: PathBuf,
    },
}

fn parse_implementations(names: Option<Vec<String>>) -> Result<Vec<CacheImpl>> {
    match names {
        None => Ok(CacheImpl::all()),
        Some(names) => names
            .iter()
            .map(|name| {
                CacheImpl::from_name(name)
                    .with_context(|| format!("unknown implementation {name:?}"))
            })
            .collect(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level.as_str())),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Generate {
            requests,
            keys,
            hot_keys,
            hot_traffic,
            scan,
            scan_length,
            rps,
            files,
            seed,
            output,
        } => {
            let config = TraceConfig {
                requests,
                keys,
                hot_keys_percent: hot_keys,
                hot_traffic_percent: hot_traffic,
                scan_percent: scan,
                scan_length,
                rps,
                files,
                seed,
                output_dir: output,
            };
            let paths = TraceGenerator::new(config).generate()?;
            println!("Wrote {} trace file(s)", paths.len());
            for path in paths {
                println!("  {}", path.display());
            }
        }

        Commands::Simulate {
            input_dir,
            capacity,
            implementations,
            output_csv,
        } => {
            let config = SimulationConfig {
                input_dir,
                capacity,
                implementations: parse_implementations(implementations)?,
            };
            let result = SimulationRunner::new(config).run()?;
            stats::print_summary(&result);

            if let Some(path) = output_csv {
                stats::export_csv(&result, &path)?;
                println!("Results exported to {}", path.display());
            }

            if let Some(divergence) = result.divergence {
                bail!("{divergence}");
            }
        }
    }

    Ok(())
}
