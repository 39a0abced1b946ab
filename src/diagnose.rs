//! # Diagnose — Gap Analysis over a Coverage Indicator
//!
//! Read-only queries over a computed indicator: which targets are uncovered,
//! how the uncovered targets (or any value list, such as A itself) spread
//! over residue classes of small moduli, and the longest stretch of
//! consecutive uncovered targets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bitset::BitSet;

/// Residue histogram: modulus q → residue r → count.
///
/// Residues with a zero count are absent from the inner map.
pub type ResidueHistogram = BTreeMap<u64, BTreeMap<u64, usize>>;

/// Default lower bound for uncovered reporting. Index 1 is never a sum of two
/// positive integers, so it is excluded by convention.
pub const DEFAULT_START: u64 = 2;

/// Ascending `k ∈ [max(1, start), len - 1]` with `B[k]` clear.
pub fn uncovered_indices(bits: &BitSet, start: u64) -> Vec<u64> {
    let from = usize::try_from(start.max(1)).unwrap_or(usize::MAX);
    bits.iter_zeros_from(from).map(|k| k as u64).collect()
}

/// Count of each residue class of `values` modulo q. Empty when q = 0.
pub fn residue_counts(values: &[u64], q: u64) -> BTreeMap<u64, usize> {
    let mut counts = BTreeMap::new();
    if q == 0 {
        return counts;
    }
    for &v in values {
        *counts.entry(v % q).or_insert(0) += 1;
    }
    counts
}

/// Residue histogram for every modulus `2 ≤ q ≤ qmax`. Empty when qmax < 2.
pub fn residue_hist(values: &[u64], qmax: u64) -> ResidueHistogram {
    (2..=qmax).map(|q| (q, residue_counts(values, q))).collect()
}

/// Dense row `[count(r = 0), ..., count(r = q - 1)]` of a histogram.
pub fn residue_row(hist: &ResidueHistogram, q: u64) -> Option<Vec<usize>> {
    let row = hist.get(&q)?;
    Some((0..q).map(|r| row.get(&r).copied().unwrap_or(0)).collect())
}

/// Length of the longest run of consecutive integers in an ascending list.
/// 0 for an empty list.
pub fn longest_uncovered_run(uncovered: &[u64]) -> usize {
    if uncovered.is_empty() {
        return 0;
    }
    let mut longest = 1;
    let mut current = 1;
    for w in uncovered.windows(2) {
        if w[1] == w[0] + 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}

/// Summary of the uncovered set, as reported by experiment runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapSummary {
    pub uncovered: usize,
    pub longest_run: usize,
    pub first_uncovered: Vec<u64>,
    /// Dense residue rows for the requested moduli (only those ≤ qmax).
    pub residue_rows: BTreeMap<u64, Vec<usize>>,
}

/// Moduli whose residue rows are included in a [`GapSummary`].
pub const SUMMARY_MODULI: [u64; 2] = [8, 12];

impl GapSummary {
    pub fn from_uncovered(uncovered: &[u64], qmax: u64) -> Self {
        let hist = residue_hist(uncovered, qmax);
        let residue_rows = SUMMARY_MODULI
            .iter()
            .filter_map(|&q| residue_row(&hist, q).map(|row| (q, row)))
            .collect();
        GapSummary {
            uncovered: uncovered.len(),
            longest_run: longest_uncovered_run(uncovered),
            first_uncovered: uncovered.iter().take(10).copied().collect(),
            residue_rows,
        }
    }
}
