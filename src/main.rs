//! # Main — CLI Entry Point
//!
//! Thin driver over the library: parses flags (or a TOML config), runs one
//! experiment or one repair, and prints the report as JSON on stdout.
//! Logs go to stderr.
//!
//! ## Global Options
//!
//! - `--engine` / `SMOOTHCOVER_ENGINE`: coverage strategy override.
//! - `--threads`: Rayon thread pool size (0 = all cores).

mod cli;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use smoothcover::Engine;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "smoothcover",
    about = "Test whether sums of two smooth integers cover a range"
)]
struct Cli {
    /// Coverage engine: baseline, two-pointer, tiled, parallel, auto.
    /// Overrides the engine of a --config file.
    #[arg(long, env = "SMOOTHCOVER_ENGINE", global = true)]
    engine: Option<Engine>,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute A+A coverage for y-smooth A and report the gaps
    Experiment(ExperimentArgs),
    /// Repair gaps by adding elements from a looser smooth halo
    Augment(AugmentArgs),
}

#[derive(Args)]
struct ExperimentArgs {
    /// Read the run from a TOML file instead of flags
    #[arg(
        long,
        conflicts_with_all = [
            "n", "c", "start", "qmax", "include_zero", "thin", "qmax_thin", "keep_ratio", "seed",
        ]
    )]
    config: Option<PathBuf>,
    /// Upper bound for the coverage test
    #[arg(long, default_value_t = 1_000_000)]
    n: u64,
    /// Smoothness exponent: y = (ln n)^C
    #[arg(long, default_value_t = 2.0)]
    c: f64,
    /// Lower bound of uncovered reporting
    #[arg(long, default_value_t = 2)]
    start: u64,
    /// Residue histogram up to this modulus
    #[arg(long, default_value_t = 64)]
    qmax: u64,
    /// Treat 0 as smooth
    #[arg(long)]
    include_zero: bool,
    /// Apply residue-balanced thinning before coverage
    #[arg(long)]
    thin: bool,
    /// Largest modulus balanced by thinning
    #[arg(long, default_value_t = 64)]
    qmax_thin: u64,
    /// Target retained fraction under thinning
    #[arg(long, default_value_t = 1.0)]
    keep_ratio: f64,
    /// Seed for thinning draws
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

#[derive(Args)]
struct AugmentArgs {
    /// Read the run from a TOML file instead of flags
    #[arg(long, conflicts_with_all = ["n", "c", "c_bump", "start", "max_add"])]
    config: Option<PathBuf>,
    /// Upper bound for the coverage test
    #[arg(long, default_value_t = 2_000_000)]
    n: u64,
    /// Smoothness exponent of the base set
    #[arg(long, default_value_t = 1.4)]
    c: f64,
    /// Halo exponent is C + C_BUMP
    #[arg(long, default_value_t = 0.05)]
    c_bump: f64,
    /// Lower bound of uncovered reporting
    #[arg(long, default_value_t = 2)]
    start: u64,
    /// Cap on the number of added elements
    #[arg(long)]
    max_add: Option<usize>,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for machine-readable logs, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Experiment(args) => cli::run_experiment(&cli, args),
        Commands::Augment(args) => cli::run_augment(&cli, args),
    }
}
