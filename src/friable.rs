//! # Friable — Smooth-Integer Enumeration
//!
//! Enumerates the P-smooth (friable) integers `1 ≤ v ≤ n` for a prime list P:
//! every `v` whose prime factors all lie in P, plus 1 by convention.
//!
//! ## Algorithm: Multiplicative Frontier
//!
//! A min-heap holds `(value, min_prime_index)` pairs, seeded with `(1, 0)`.
//! Each popped value is recorded and extended by every prime `P[j]` with
//! `j ≥ min_prime_index`; the product is pushed tagged with `j`. Restricting
//! extensions to non-decreasing prime indices means each product is reached
//! along exactly one factor ordering, and the seen-set catches the rest. The
//! prime sweep for a value stops at the first product above n, since P is
//! ascending.
//!
//! Complexity: O(|A| · log |A|) heap work plus O(|A| · avg-extensions).

use anyhow::Result;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::sieve;

/// All P-smooth integers in `[1, n]`, ascending, deduplicated.
///
/// `n < 1` yields an empty list; otherwise 1 is always included. `primes`
/// must be strictly ascending and prime, see [`sieve::validate_prime_list`].
pub fn generate_friables(n: u64, primes: &[u64]) -> Result<Vec<u64>> {
    sieve::validate_prime_list(primes)?;
    Ok(frontier_expand(n, primes))
}

fn frontier_expand(n: u64, primes: &[u64]) -> Vec<u64> {
    if n < 1 {
        return vec![];
    }
    let mut out = Vec::new();
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::new();
    let mut seen: HashSet<u64> = HashSet::new();
    heap.push(Reverse((1, 0)));
    seen.insert(1);

    while let Some(Reverse((value, idx))) = heap.pop() {
        out.push(value);
        for (j, &p) in primes.iter().enumerate().skip(idx) {
            let next = match value.checked_mul(p) {
                Some(v) if v <= n => v,
                _ => break,
            };
            if seen.insert(next) {
                heap.push(Reverse((next, j)));
            }
        }
    }
    // Heap order is already ascending; sort anyway so the contract does not
    // hinge on pop order.
    out.sort_unstable();
    out
}

/// Prepend 0 to an ascending smooth list unless it is already present.
///
/// Some experiments treat 0 as smooth so that `A + A ⊇ A`; the generator
/// itself never emits it.
pub fn admit_zero(mut values: Vec<u64>) -> Vec<u64> {
    if values.first() != Some(&0) {
        values.insert(0, 0);
    }
    values
}

/// Halo pool: smooth integers up to n under the wider prime list that are not
/// already in `a`. Ascending.
pub fn halo(n: u64, wide_primes: &[u64], a: &[u64]) -> Result<Vec<u64>> {
    let base: HashSet<u64> = a.iter().copied().collect();
    let wide = generate_friables(n, wide_primes)?;
    Ok(wide.into_iter().filter(|v| !base.contains(v)).collect())
}
