//! # Thin — Residue-Balanced Subsampling of A
//!
//! Smooth sets are heavily biased towards residue classes sharing factors
//! with small moduli (even numbers, multiples of 3, ...). Thinning keeps a
//! random subset of A, sized around `keep_ratio · |A|`, that suppresses the
//! over-represented classes.
//!
//! ## Weights
//!
//! For each element a and each modulus `2 ≤ q ≤ qmax_thin`, the pressure is
//! `(|A| / q) / count(a mod q)`: below 1 when a's class holds more than its
//! uniform share. The element's weight is the minimum pressure, starting from
//! 1.0, clipped into `[1e-6, 10.0]`. A global scale λ makes the expected
//! retained count `λ · Σ weight = keep_ratio · |A|`; element a is kept with
//! probability `min(1, λ · weight(a))`.
//!
//! Draws come from a `StdRng` seeded with the caller's seed, one draw per
//! element with probability below 1, in ascending order, so a fixed seed
//! reproduces the same subset.

use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::diagnose::residue_counts;

pub const WEIGHT_FLOOR: f64 = 1e-6;
pub const WEIGHT_CEIL: f64 = 10.0;
pub const DEFAULT_QMAX_THIN: u64 = 64;
pub const DEFAULT_SEED: u64 = 12345;

/// Residue-balanced subsequence of `a`, ascending.
///
/// `keep_ratio` must lie in (0, 1]. At 1.0 nothing is dropped.
pub fn residue_balanced_thin(
    a: &[u64],
    qmax_thin: u64,
    keep_ratio: f64,
    seed: u64,
) -> Result<Vec<u64>> {
    ensure!(
        keep_ratio.is_finite() && keep_ratio > 0.0 && keep_ratio <= 1.0,
        "keep_ratio must be in (0, 1], got {}",
        keep_ratio
    );
    let mut sorted = a.to_vec();
    sorted.sort_unstable();
    if sorted.is_empty() || keep_ratio >= 1.0 {
        return Ok(sorted);
    }

    let weights = pressure_weights(&sorted, qmax_thin);
    let total: f64 = weights.iter().sum();
    let size = sorted.len() as f64;
    let lambda = if total > 0.0 {
        keep_ratio * size / total
    } else {
        1.0
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let kept: Vec<u64> = sorted
        .iter()
        .zip(&weights)
        .filter(|&(_, &w)| {
            let p = lambda * w;
            p >= 1.0 || rng.gen::<f64>() < p
        })
        .map(|(&v, _)| v)
        .collect();

    debug!(
        input = sorted.len(),
        kept = kept.len(),
        lambda,
        qmax_thin,
        keep_ratio,
        "residue-balanced thinning"
    );
    Ok(kept)
}

/// Per-element weight: minimum over q of (uniform share / class count),
/// starting at 1.0 and clipped to the stability band.
fn pressure_weights(sorted: &[u64], qmax_thin: u64) -> Vec<f64> {
    let size = sorted.len() as f64;
    let counts: Vec<(u64, std::collections::BTreeMap<u64, usize>)> = (2..=qmax_thin)
        .map(|q| (q, residue_counts(sorted, q)))
        .collect();

    sorted
        .iter()
        .map(|&v| {
            let w = counts.iter().fold(1.0f64, |w, (q, by_residue)| {
                match by_residue.get(&(v % q)) {
                    Some(&count) if count > 0 => w.min((size / *q as f64) / count as f64),
                    _ => w,
                }
            });
            w.clamp(WEIGHT_FLOOR, WEIGHT_CEIL)
        })
        .collect()
}
