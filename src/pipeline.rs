//! # Pipeline — Single-Run Composition
//!
//! Chains the core stages for one parameter point:
//!
//! ```text
//! sieve → friables → (thin) → coverage → diagnose
//! sieve → friables → coverage → diagnose → halo → augment → coverage
//! ```
//!
//! Each run recomputes every entity from `(n, c)`; nothing is cached across
//! runs. Reports are plain serde structs so that outer tooling (tables,
//! plots, sweeps over c) can consume them without touching the core.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::augment::greedy_augment;
use crate::config::{AugmentConfig, ExperimentConfig};
use crate::coverage::coverage;
use crate::diagnose::{uncovered_indices, GapSummary};
use crate::friable::{admit_zero, generate_friables, halo};
use crate::sieve::{generate_primes, smoothness_bound};
use crate::thin::residue_balanced_thin;

/// Wall-clock seconds spent in each stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    pub sieve: f64,
    pub friables: f64,
    pub thin: f64,
    pub coverage: f64,
    pub diagnose: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub n: u64,
    pub c: f64,
    pub y: u64,
    pub prime_count: usize,
    /// |A| before thinning (including 0 when admitted).
    pub a_size: usize,
    /// |A| actually used for coverage.
    pub a_used: usize,
    pub engine: String,
    pub gaps: GapSummary,
    pub timings: StageTimings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentReport {
    pub n: u64,
    pub c: f64,
    pub c_bump: f64,
    pub y_a: u64,
    pub y_h: u64,
    pub a_size: usize,
    pub unc_base: usize,
    pub h_candidates: usize,
    pub added: usize,
    /// Uncovered count after re-verifying `A ∪ added` with the engine.
    pub unc_after: usize,
    pub added_head: Vec<u64>,
}

/// Run one coverage experiment.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport> {
    config.validate()?;
    let mut timings = StageTimings::default();
    let y = smoothness_bound(config.n, config.c);
    info!(n = config.n, c = config.c, y, engine = %config.engine, "experiment starting");

    let t = Instant::now();
    // Primes above n never divide a member of [1, n].
    let primes = generate_primes(y.min(config.n));
    timings.sieve = t.elapsed().as_secs_f64();
    info!(primes = primes.len(), secs = timings.sieve, "stage: primes <= y");

    let t = Instant::now();
    let mut a = generate_friables(config.n, &primes)?;
    if config.include_zero {
        a = admit_zero(a);
    }
    timings.friables = t.elapsed().as_secs_f64();
    info!(a_size = a.len(), secs = timings.friables, "stage: smooth set");

    let a_size = a.len();
    let used = match &config.thin {
        Some(thin) => {
            let t = Instant::now();
            let kept = residue_balanced_thin(&a, thin.qmax_thin, thin.keep_ratio, thin.seed)?;
            timings.thin = t.elapsed().as_secs_f64();
            info!(kept = kept.len(), secs = timings.thin, "stage: thinning");
            kept
        }
        None => a,
    };

    let t = Instant::now();
    let bits = coverage(&used, config.n, config.engine)?;
    timings.coverage = t.elapsed().as_secs_f64();
    info!(covered = bits.count_ones(), secs = timings.coverage, "stage: coverage");

    let t = Instant::now();
    let unc = uncovered_indices(&bits, config.start);
    let gaps = GapSummary::from_uncovered(&unc, config.qmax);
    timings.diagnose = t.elapsed().as_secs_f64();
    info!(
        uncovered = gaps.uncovered,
        longest_run = gaps.longest_run,
        "stage: diagnostics"
    );

    Ok(ExperimentReport {
        n: config.n,
        c: config.c,
        y,
        prime_count: primes.len(),
        a_size,
        a_used: used.len(),
        engine: config.engine.to_string(),
        gaps,
        timings,
    })
}

/// Run one repair: base set at `c`, halo at `c + c_bump`, then re-verify.
pub fn run_augment(config: &AugmentConfig) -> Result<AugmentReport> {
    config.validate()?;
    let n = config.n;
    let y_a = smoothness_bound(n, config.c);
    let y_h = smoothness_bound(n, config.c + config.c_bump);
    info!(n, y_a, y_h, "augment starting");

    let a = generate_friables(n, &generate_primes(y_a.min(n)))?;
    let base = coverage(&a, n, config.engine)?;
    let unc = uncovered_indices(&base, config.start);
    info!(a_size = a.len(), uncovered = unc.len(), "base coverage");

    let candidates = halo(n, &generate_primes(y_h.min(n)), &a)?;
    info!(candidates = candidates.len(), "halo pool");

    let repair = greedy_augment(n, &a, &unc, &candidates, config.max_add)?;

    let unc_after = if repair.added.is_empty() {
        unc.len()
    } else {
        let mut merged = a.clone();
        merged.extend_from_slice(&repair.added);
        merged.sort_unstable();
        let after = coverage(&merged, n, config.engine)?;
        uncovered_indices(&after, config.start).len()
    };
    info!(added = repair.added.len(), unc_after, "augment verified");

    Ok(AugmentReport {
        n,
        c: config.c,
        c_bump: config.c_bump,
        y_a,
        y_h,
        a_size: a.len(),
        unc_base: unc.len(),
        h_candidates: candidates.len(),
        added: repair.added.len(),
        unc_after,
        added_head: repair.added.iter().take(10).copied().collect(),
    })
}
