//! # Coverage — Sumset Indicator of A + A over [0, n]
//!
//! Computes the indicator B with `B[k] = true` iff `k = a + a'` for some
//! `a, a' ∈ A` (a = a' allowed), `0 ≤ k ≤ n`.
//!
//! ## Strategies
//!
//! | Strategy      | Inner loop                                   |
//! |---------------|----------------------------------------------|
//! | `baseline`    | full scan, early break once the sum passes n |
//! | `two-pointer` | binary-searched row bound, no overshoot      |
//! | `tiled`       | two-pointer in cache-sized chunks            |
//! | `parallel`    | static row blocks, private buffers, OR-merge |
//!
//! All four are pure functions of (A, n) and produce bit-identical
//! indicators. Which one runs is configuration ([`Engine`]), never
//! correctness.
//!
//! ## Failover
//!
//! A strategy that cannot run on this host returns [`StrategyUnavailable`].
//! [`coverage_with`] catches exactly that error and reruns with
//! [`TwoPointer`]. Allocation failure is not caught: it propagates to the
//! caller.

pub mod strategy;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, warn};

use crate::bitset::BitSet;
pub use strategy::{Baseline, Parallel, Tiled, TwoPointer, DEFAULT_TILE};

/// A way of computing the coverage indicator.
///
/// `a` is ascending, deduplicated, non-empty, every member ≤ n, and
/// `len == n + 1`.
pub trait CoverageStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn mark(&self, a: &[u64], n: u64, len: usize) -> Result<BitSet>;
}

/// A strategy could not run on this host. Recovered by failover.
#[derive(Debug, Clone)]
pub struct StrategyUnavailable {
    pub strategy: &'static str,
    pub reason: String,
}

impl std::fmt::Display for StrategyUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} strategy unavailable: {}", self.strategy, self.reason)
    }
}

impl std::error::Error for StrategyUnavailable {}

/// Configured coverage engine.
///
/// `Auto` resolves to `Parallel` when the rayon pool has more than one
/// thread, `TwoPointer` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    Baseline,
    TwoPointer,
    Tiled,
    Parallel,
    #[default]
    Auto,
}

impl Engine {
    pub const ALL: [Engine; 5] = [
        Engine::Baseline,
        Engine::TwoPointer,
        Engine::Tiled,
        Engine::Parallel,
        Engine::Auto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Baseline => "baseline",
            Engine::TwoPointer => "two-pointer",
            Engine::Tiled => "tiled",
            Engine::Parallel => "parallel",
            Engine::Auto => "auto",
        }
    }

    /// Concrete strategy with default tuning.
    pub fn strategy(&self) -> Box<dyn CoverageStrategy> {
        match self {
            Engine::Baseline => Box::new(Baseline),
            Engine::TwoPointer => Box::new(TwoPointer),
            Engine::Tiled => Box::new(Tiled::default()),
            Engine::Parallel => Box::new(Parallel::default()),
            Engine::Auto => {
                if rayon::current_num_threads() > 1 {
                    Box::new(Parallel::default())
                } else {
                    Box::new(TwoPointer)
                }
            }
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Engine::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == key)
            .ok_or_else(|| {
                anyhow!(
                    "unknown coverage engine '{}' (expected baseline, two-pointer, tiled, parallel or auto)",
                    s
                )
            })
    }
}

/// Coverage indicator of `a + a` over `[0, n]` using `engine`.
pub fn coverage(a: &[u64], n: u64, engine: Engine) -> Result<BitSet> {
    coverage_with(a, n, engine.strategy().as_ref())
}

/// Coverage indicator using an explicit strategy.
///
/// Degenerate inputs never reach the strategy: `n < 1` gives a single clear
/// bit, an empty `a` gives `n + 1` clear bits. Unsorted or duplicated input
/// is normalised on a copy, and members above n are dropped since they
/// cannot contribute to any sum ≤ n.
pub fn coverage_with(a: &[u64], n: u64, strategy: &dyn CoverageStrategy) -> Result<BitSet> {
    if n < 1 {
        return BitSet::try_new(1);
    }
    let len = indicator_len(n)?;
    let a = prepare(a, n);
    if a.is_empty() {
        return BitSet::try_new(len);
    }

    let started = Instant::now();
    let (bits, ran) = mark_with_failover(&a, n, len, strategy)?;
    debug!(
        strategy = ran,
        n,
        a_size = a.len(),
        covered = bits.count_ones(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "coverage computed"
    );
    Ok(bits)
}

/// Run `strategy`, or [`TwoPointer`] if it reports itself unavailable.
/// Returns the indicator and the name of the strategy that produced it.
fn mark_with_failover(
    a: &[u64],
    n: u64,
    len: usize,
    strategy: &dyn CoverageStrategy,
) -> Result<(BitSet, &'static str)> {
    match strategy.mark(a, n, len) {
        Ok(bits) => Ok((bits, strategy.name())),
        Err(e) => match e.downcast_ref::<StrategyUnavailable>() {
            Some(unavailable) => {
                warn!(
                    strategy = unavailable.strategy,
                    reason = %unavailable.reason,
                    fallback = TwoPointer.name(),
                    "coverage strategy unavailable, failing over"
                );
                Ok((TwoPointer.mark(a, n, len)?, TwoPointer.name()))
            }
            None => Err(e),
        },
    }
}

fn indicator_len(n: u64) -> Result<usize> {
    usize::try_from(n)
        .ok()
        .and_then(|v| v.checked_add(1))
        .ok_or_else(|| anyhow!("n = {} exceeds addressable indicator size", n))
}

/// Borrow `a` when it is already strictly ascending and bounded by n;
/// otherwise sort, dedup and trim a copy.
fn prepare(a: &[u64], n: u64) -> Cow<'_, [u64]> {
    let ascending = a.windows(2).all(|w| w[0] < w[1]);
    let bounded = a.last().is_none_or(|&last| last <= n);
    if ascending && bounded {
        return Cow::Borrowed(a);
    }
    let mut owned: Vec<u64> = a.iter().copied().filter(|&v| v <= n).collect();
    owned.sort_unstable();
    owned.dedup();
    Cow::Owned(owned)
}
