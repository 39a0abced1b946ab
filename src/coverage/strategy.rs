//! Coverage strategy implementations.
//!
//! Every strategy receives a prepared `a` (ascending, deduplicated, non-empty,
//! all members ≤ n) and returns an indicator of length n+1. Marking is
//! idempotent and monotone, so visiting a pair twice or in any order is
//! harmless.

use anyhow::Result;
use rayon::prelude::*;
use std::ops::Range;

use super::{CoverageStrategy, StrategyUnavailable};
use crate::bitset::BitSet;

/// Default inner-chunk width for [`Tiled`], in elements of A.
pub const DEFAULT_TILE: usize = 4096;

/// Number of j indices with `a[j] + ai ≤ n`, found by binary search.
#[inline]
fn row_bound(a: &[u64], ai: u64, n: u64) -> usize {
    let limit = n - ai;
    a.partition_point(|&x| x <= limit)
}

/// Mark every sum `a[i] + a[j] ≤ n` for i in `rows`, using the binary-search
/// row bound. Shared by [`TwoPointer`] and the parallel workers.
fn mark_rows_bounded(a: &[u64], n: u64, rows: Range<usize>, bits: &mut BitSet) {
    for i in rows {
        let ai = a[i];
        let bound = row_bound(a, ai, n);
        if bound == 0 {
            // Rows only get narrower as ai grows.
            break;
        }
        for &aj in &a[..bound] {
            bits.set((ai + aj) as usize);
        }
    }
}

/// Reference strategy: full inner scan with early break once the sum
/// exceeds n.
#[derive(Debug, Clone, Copy, Default)]
pub struct Baseline;

impl CoverageStrategy for Baseline {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn mark(&self, a: &[u64], n: u64, len: usize) -> Result<BitSet> {
        let mut bits = BitSet::try_new(len)?;
        for &ai in a {
            for &aj in a {
                let s = ai + aj;
                if s > n {
                    break;
                }
                bits.set(s as usize);
            }
        }
        Ok(bits)
    }
}

/// Binary-search pruning: each row iterates exactly `[0, j_max)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPointer;

impl CoverageStrategy for TwoPointer {
    fn name(&self) -> &'static str {
        "two-pointer"
    }

    fn mark(&self, a: &[u64], n: u64, len: usize) -> Result<BitSet> {
        let mut bits = BitSet::try_new(len)?;
        mark_rows_bounded(a, n, 0..a.len(), &mut bits);
        Ok(bits)
    }
}

/// Cache-tiled variant of [`TwoPointer`].
///
/// Rows are processed in groups of `tile`, and within a group the inner range
/// is walked one `tile`-wide chunk of A at a time across all rows of the
/// group, so the chunk stays hot while its sums are marked.
#[derive(Debug, Clone, Copy)]
pub struct Tiled {
    pub tile: usize,
}

impl Default for Tiled {
    fn default() -> Self {
        Tiled { tile: DEFAULT_TILE }
    }
}

impl CoverageStrategy for Tiled {
    fn name(&self) -> &'static str {
        "tiled"
    }

    fn mark(&self, a: &[u64], n: u64, len: usize) -> Result<BitSet> {
        let tile = self.tile.max(1);
        let mut bits = BitSet::try_new(len)?;
        let mut bounds: Vec<usize> = Vec::with_capacity(tile.min(a.len()));

        for row_start in (0..a.len()).step_by(tile) {
            let row_end = (row_start + tile).min(a.len());
            bounds.clear();
            bounds.extend(a[row_start..row_end].iter().map(|&ai| row_bound(a, ai, n)));

            // bounds are non-increasing; the first row is the widest
            let widest = bounds[0];
            if widest == 0 {
                break;
            }
            for col_start in (0..widest).step_by(tile) {
                let col_end = (col_start + tile).min(widest);
                for (offset, &bound) in bounds.iter().enumerate() {
                    if bound <= col_start {
                        break;
                    }
                    let ai = a[row_start + offset];
                    for &aj in &a[col_start..col_end.min(bound)] {
                        bits.set((ai + aj) as usize);
                    }
                }
            }
        }
        Ok(bits)
    }
}

/// Data-parallel strategy.
///
/// The row range is split statically into `blocks` contiguous ranges before
/// any work starts. Each block marks into its own private indicator; the
/// finished indicators are OR-reduced in one step. No state is shared while
/// workers run.
///
/// `threads = None` runs on the ambient rayon pool. `Some(t)` builds a
/// dedicated pool of `t` threads; failure to build it is reported as
/// [`StrategyUnavailable`] so the engine can fail over.
#[derive(Debug, Clone, Copy)]
pub struct Parallel {
    pub blocks: usize,
    pub threads: Option<usize>,
}

impl Default for Parallel {
    fn default() -> Self {
        Parallel {
            blocks: rayon::current_num_threads().max(1),
            threads: None,
        }
    }
}

/// Split `0..m` into `blocks` contiguous ranges with sizes differing by at
/// most one. Empty ranges are dropped.
pub(crate) fn split_rows(m: usize, blocks: usize) -> Vec<Range<usize>> {
    let blocks = blocks.max(1);
    (0..blocks)
        .map(|k| (k * m / blocks)..((k + 1) * m / blocks))
        .filter(|r| !r.is_empty())
        .collect()
}

impl Parallel {
    fn run(&self, a: &[u64], n: u64, len: usize) -> Result<BitSet> {
        let parts: Vec<BitSet> = split_rows(a.len(), self.blocks)
            .into_par_iter()
            .map(|rows| -> Result<BitSet> {
                let mut local = BitSet::try_new(len)?;
                mark_rows_bounded(a, n, rows, &mut local);
                Ok(local)
            })
            .collect::<Result<Vec<_>>>()?;

        let merged = parts.into_iter().reduce(|mut acc, part| {
            acc.union_with(&part);
            acc
        });
        match merged {
            Some(bits) => Ok(bits),
            None => BitSet::try_new(len),
        }
    }
}

impl CoverageStrategy for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn mark(&self, a: &[u64], n: u64, len: usize) -> Result<BitSet> {
        match self.threads {
            None => self.run(a, n, len),
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| StrategyUnavailable {
                        strategy: self.name(),
                        reason: e.to_string(),
                    })?;
                pool.install(|| self.run(a, n, len))
            }
        }
    }
}
