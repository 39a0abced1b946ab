//! # Augment — Greedy Gap Repair from a Halo Pool
//!
//! Given the uncovered targets of `A + A` and a pool H of extra candidates
//! (typically smooth under a looser bound, minus A), pick a small subset of H
//! whose addition covers as many targets as possible.
//!
//! ## Algorithm: Greedy Maximum Coverage
//!
//! Candidate h covers target k when `k − h ∈ A`. The covered-target list of
//! every candidate is precomputed in parallel (order preserved). Each round
//! picks the candidate covering the most still-remaining targets; ties go to
//! the candidate that appears first in H. The loop ends when nothing remains,
//! the `max_add` cap is reached, or the best gain is zero.
//!
//! Once h is added, sums among added elements (`h + h'`, including `2h`) are
//! members of the new sumset too, so targets hit that way are retired as
//! well. With that, `remaining` is exactly the uncovered list of
//! `A ∪ added`, provided `uncovered` was the uncovered list of A.
//!
//! Greedy set cover carries no optimality guarantee; it is deterministic for
//! a fixed halo order and target set.

use anyhow::{anyhow, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bitset::BitSet;

/// Result of a repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Augmentation {
    /// Chosen halo elements, in selection order.
    pub added: Vec<u64>,
    /// Targets still uncovered after adding, ascending.
    pub remaining: Vec<u64>,
}

/// Greedily select elements of `halo` that cover the `uncovered` targets.
///
/// Exhausting the halo with targets left over is a normal outcome (non-empty
/// `remaining`), not an error. `max_add = Some(0)` adds nothing.
pub fn greedy_augment(
    n: u64,
    a: &[u64],
    uncovered: &[u64],
    halo: &[u64],
    max_add: Option<usize>,
) -> Result<Augmentation> {
    let mut targets = uncovered.to_vec();
    targets.sort_unstable();
    targets.dedup();

    if targets.is_empty() || halo.is_empty() || max_add == Some(0) {
        return Ok(Augmentation {
            added: vec![],
            remaining: targets,
        });
    }

    let span = usize::try_from(n)
        .ok()
        .and_then(|v| v.checked_add(1))
        .ok_or_else(|| anyhow!("n = {} exceeds addressable membership size", n))?;
    let members = BitSet::try_from_values(span, a)?;

    // Target indices each candidate covers through A.
    let covers: Vec<Vec<usize>> = halo
        .par_iter()
        .map(|&h| {
            targets
                .iter()
                .enumerate()
                .filter(|&(_, &k)| k >= h && members.get((k - h) as usize))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    let mut live = vec![true; targets.len()];
    let mut live_count = targets.len();
    let mut added: Vec<u64> = Vec::new();

    while live_count > 0 {
        if max_add.is_some_and(|cap| added.len() >= cap) {
            break;
        }

        let mut best: Option<usize> = None;
        let mut best_gain = 0usize;
        for (ci, hits) in covers.iter().enumerate() {
            // A candidate cannot beat best_gain if it has fewer hits overall.
            if hits.len() <= best_gain {
                continue;
            }
            let gain = hits.iter().filter(|&&ti| live[ti]).count();
            if gain > best_gain {
                best_gain = gain;
                best = Some(ci);
            }
        }
        let Some(ci) = best else {
            break;
        };

        let h = halo[ci];
        for &ti in &covers[ci] {
            if live[ti] {
                live[ti] = false;
                live_count -= 1;
            }
        }
        added.push(h);
        for &other in &added {
            if let Some(sum) = h.checked_add(other) {
                if let Ok(ti) = targets.binary_search(&sum) {
                    if live[ti] {
                        live[ti] = false;
                        live_count -= 1;
                    }
                }
            }
        }
        debug!(element = h, gain = best_gain, remaining = live_count, "augment pick");
    }

    let remaining: Vec<u64> = targets
        .iter()
        .zip(&live)
        .filter(|&(_, &alive)| alive)
        .map(|(&k, _)| k)
        .collect();

    info!(
        targets = targets.len(),
        halo = halo.len(),
        added = added.len(),
        remaining = remaining.len(),
        "greedy augmentation finished"
    );
    Ok(Augmentation { added, remaining })
}

#[cfg(test)]
mod tests {
    //! Greedy repair tests: degenerate inputs, the tie-break rule, the cap,
    //! and exactness of `remaining` against a recomputed coverage.

    use super::*;
    use crate::coverage::{coverage, Engine};
    use crate::diagnose::uncovered_indices;

    #[test]
    fn empty_halo_returns_uncovered_unchanged() {
        let out = greedy_augment(20, &[1, 2, 3], &[7, 8, 9], &[], None).unwrap();
        assert!(out.added.is_empty());
        assert_eq!(out.remaining, vec![7, 8, 9]);
    }

    #[test]
    fn nothing_to_cover() {
        let out = greedy_augment(20, &[1, 2], &[], &[5, 6], None).unwrap();
        assert_eq!(out, Augmentation::default());
    }

    #[test]
    fn zero_cap_adds_nothing() {
        let out = greedy_augment(20, &[1, 2, 3], &[7, 8], &[5], Some(0)).unwrap();
        assert!(out.added.is_empty());
        assert_eq!(out.remaining, vec![7, 8]);
    }

    /// A = {1,2,3}, targets 7..=9. Candidate 6 covers {7,8,9}; 5 covers
    /// {7,8}. The larger gain wins regardless of order.
    #[test]
    fn picks_largest_gain() {
        let out = greedy_augment(20, &[1, 2, 3], &[7, 8, 9], &[5, 6], None).unwrap();
        assert_eq!(out.added, vec![6]);
        assert!(out.remaining.is_empty());
    }

    /// Equal gains: the candidate listed first in the halo is chosen.
    #[test]
    fn ties_go_to_first_candidate() {
        let a = [1u64, 2];
        // 10 covers {11, 12}; 20 covers {21, 22}
        let out = greedy_augment(30, &a, &[11, 12, 21, 22], &[20, 10], Some(1)).unwrap();
        assert_eq!(out.added, vec![20]);
        assert_eq!(out.remaining, vec![11, 12]);

        let out = greedy_augment(30, &a, &[11, 12, 21, 22], &[10, 20], Some(1)).unwrap();
        assert_eq!(out.added, vec![10]);
        assert_eq!(out.remaining, vec![21, 22]);
    }

    #[test]
    fn stops_when_no_gain_remains() {
        // 100 reaches nothing: 3 - 100 is negative
        let out = greedy_augment(200, &[1], &[3, 50], &[100, 2], None).unwrap();
        assert_eq!(out.added, vec![2]);
        assert_eq!(out.remaining, vec![50]);
    }

    /// Adding h also puts 2h and h + h' into the sumset; such targets must
    /// not be reported as remaining.
    #[test]
    fn sums_among_added_elements_are_retired() {
        let a = [1u64];
        // 10 covers 11 via A and 20 via 10 + 10
        let out = greedy_augment(30, &a, &[11, 20], &[10], None).unwrap();
        assert_eq!(out.added, vec![10]);
        assert!(out.remaining.is_empty());
    }

    #[test]
    fn remaining_matches_recomputed_coverage() {
        let n = 400u64;
        let a: Vec<u64> = vec![1, 2, 3, 4, 6, 8, 9, 12, 16, 18, 24, 27, 32, 36];
        let b = coverage(&a, n, Engine::TwoPointer).unwrap();
        let unc = uncovered_indices(&b, 2);
        let halo: Vec<u64> = vec![5, 10, 15, 20, 25, 30, 40, 45, 50, 60, 75, 80, 90, 100];

        let out = greedy_augment(n, &a, &unc, &halo, None).unwrap();
        assert!(!out.added.is_empty());

        let mut merged = a.clone();
        merged.extend(&out.added);
        merged.sort_unstable();
        let after = coverage(&merged, n, Engine::TwoPointer).unwrap();
        assert_eq!(out.remaining, uncovered_indices(&after, 2));
    }
}
