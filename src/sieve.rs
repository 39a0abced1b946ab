//! # Sieve — Prime Generation and Prime-List Validation
//!
//! Produces the generating prime list for every smooth set in the crate.
//! Provides:
//!
//! 1. **Prime generation** via a wheel-30 sieve of Eratosthenes (26.7% memory
//!    of naive sieve — stores only residues coprime to {2, 3, 5}).
//! 2. **Prime-list validation** for caller-supplied lists: strictly ascending,
//!    every entry prime. A malformed list is the one configuration error the
//!    friable generator refuses.
//! 3. **Smoothness bound** `y = ⌊(ln n)^C⌋`, the exponent parameterisation
//!    used by every experiment.
//!
//! ## Algorithm: Wheel-30 Sieve
//!
//! The sieve tracks only integers coprime to 30 = 2·3·5 (8 residues per 30).
//! Each segment of 30 consecutive integers is packed into a single byte.
//! Complexity: O(m log log m) time, O(m/30) space.

use anyhow::{ensure, Result};

/// Generate all primes up to `limit` using a wheel-30 sieve.
///
/// Returns an empty list for `limit < 2`. Output is ascending with no
/// duplicates.
pub fn generate_primes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return vec![];
    }
    if limit < 7 {
        return [2, 3, 5].iter().copied().filter(|&p| p <= limit).collect();
    }

    // Residues coprime to 30: these are the only positions we track
    const RESIDUES: [u8; 8] = [1, 7, 11, 13, 17, 19, 23, 29];

    // Map residue → index in the wheel (255 = not coprime to 30)
    const RES_TO_IDX: [u8; 30] = [
        255, 0, 255, 255, 255, 255, 255, 1, 255, 255, 255, 2, 255, 3, 255, 255, 255, 4, 255, 5,
        255, 255, 255, 6, 255, 255, 255, 255, 255, 7,
    ];

    let limit = limit as usize;
    let num_segments = limit / 30 + 1;
    let mut wheel = vec![0xFFu8; num_segments];

    let root = isqrt(limit as u64) as usize;
    for seg in 0..=(root / 30) {
        for (bit, &ri) in RESIDUES.iter().enumerate() {
            let p = seg * 30 + ri as usize;
            if p < 7 || p > root {
                continue;
            }
            if wheel[seg] & (1 << bit) == 0 {
                continue;
            }
            let mut m = p * p;
            while m <= limit {
                let idx = RES_TO_IDX[m % 30];
                if idx != 255 {
                    wheel[m / 30] &= !(1 << idx);
                }
                m += p;
            }
        }
    }

    let mut primes = Vec::with_capacity(estimate_prime_count(limit));
    primes.extend_from_slice(&[2, 3, 5]);
    for (seg, &byte) in wheel.iter().enumerate() {
        if byte == 0 {
            continue;
        }
        for (bit, &r) in RESIDUES.iter().enumerate() {
            if byte & (1 << bit) != 0 {
                let v = seg * 30 + r as usize;
                if v > 5 && v <= limit {
                    primes.push(v as u64);
                }
            }
        }
    }
    primes
}

/// Upper-leaning estimate of π(n), used only to size the output vector.
fn estimate_prime_count(n: usize) -> usize {
    if n < 10 {
        return 4;
    }
    let nf = n as f64;
    (1.3 * nf / nf.ln()) as usize
}

/// Integer square root, exact for all u64 (f64 seed plus correction).
pub fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = (n as f64).sqrt() as u64;
    while x > 0 && x.checked_mul(x).map_or(true, |sq| sq > n) {
        x -= 1;
    }
    while (x + 1).checked_mul(x + 1).is_some_and(|sq| sq <= n) {
        x += 1;
    }
    x
}

/// Deterministic primality check by trial division over 6k±1.
/// Only used to validate caller-supplied prime lists, which are small.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n.is_multiple_of(2) || n.is_multiple_of(3) {
        return false;
    }
    let mut d = 5u64;
    while d.saturating_mul(d) <= n {
        if n.is_multiple_of(d) || n.is_multiple_of(d + 2) {
            return false;
        }
        d += 6;
    }
    true
}

/// Reject prime lists the friable generator cannot use: entries must be
/// strictly ascending and prime.
pub fn validate_prime_list(primes: &[u64]) -> Result<()> {
    for (i, &p) in primes.iter().enumerate() {
        ensure!(is_prime(p), "prime list entry {} at index {} is not prime", p, i);
        if i > 0 {
            let prev = primes[i - 1];
            ensure!(
                prev < p,
                "prime list not strictly ascending: {} at index {} follows {}",
                p,
                i,
                prev
            );
        }
    }
    Ok(())
}

/// Smoothness bound `y = ⌊(ln n)^c⌋` (natural log).
///
/// Returns 0 for `n < 2` (ln n ≤ 0 gives no usable bound) and for
/// non-finite or non-positive `c`.
pub fn smoothness_bound(n: u64, c: f64) -> u64 {
    if n < 2 || !c.is_finite() || c <= 0.0 {
        return 0;
    }
    let y = (n as f64).ln().powf(c);
    if y.is_finite() && y > 0.0 {
        y.floor() as u64
    } else {
        0
    }
}
