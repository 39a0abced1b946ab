//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: builds the run
//! configuration from flags or a TOML file, applies the engine override,
//! runs the pipeline and prints the JSON report.

use anyhow::Result;
use serde::Serialize;
use smoothcover::config::{AugmentConfig, ExperimentConfig, ThinConfig};
use smoothcover::pipeline;
use tracing::{info, warn};

use super::{AugmentArgs, Cli, ExperimentArgs};

pub fn run_experiment(cli: &Cli, args: &ExperimentArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig {
            n: args.n,
            c: args.c,
            start: args.start,
            qmax: args.qmax,
            include_zero: args.include_zero,
            thin: args.thin.then(|| ThinConfig {
                qmax_thin: args.qmax_thin,
                keep_ratio: args.keep_ratio,
                seed: args.seed,
            }),
            engine: Default::default(),
        },
    };
    if let Some(engine) = cli.engine {
        config.engine = engine;
    }
    info!(
        cores = rayon::current_num_threads(),
        engine = %config.engine,
        "smoothcover experiment"
    );
    print_report(&pipeline::run_experiment(&config)?)
}

pub fn run_augment(cli: &Cli, args: &AugmentArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AugmentConfig::load(path)?,
        None => AugmentConfig {
            n: args.n,
            c: args.c,
            c_bump: args.c_bump,
            start: args.start,
            max_add: args.max_add,
            engine: Default::default(),
        },
    };
    if let Some(engine) = cli.engine {
        config.engine = engine;
    }
    info!(
        cores = rayon::current_num_threads(),
        engine = %config.engine,
        "smoothcover augment"
    );
    print_report(&pipeline::run_augment(&config)?)
}

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Size the global rayon pool. `None` or 0 keeps rayon's default (all cores).
pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
