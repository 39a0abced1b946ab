//! Property-based tests for smoothcover's core operations.
//!
//! These tests use the `proptest` framework to check invariants across many
//! randomly generated instances rather than a handful of fixed examples.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//!
//! # Increase case count for thorough testing (default is 256):
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```
//!
//! # Testing strategy
//!
//! - **Coverage**: strategy determinism and the closure property against a
//!   brute-force pair enumeration.
//! - **Friables / sieve**: exact membership against trial division.
//! - **Monotonicity**: growing n or the prime set never uncovers anything.
//! - **Augmentation**: `remaining` equals the recomputed uncovered list.
//! - **Diagnostics**: histogram rows sum to the uncovered count.
//!
//! Each property is named `prop_<operation>_<invariant>`.

use proptest::prelude::*;
use smoothcover::coverage::{Baseline, Parallel, Tiled, TwoPointer};
use smoothcover::{
    coverage, coverage_with, generate_friables, generate_primes, greedy_augment,
    longest_uncovered_run, residue_hist, uncovered_indices, CoverageStrategy, Engine,
};

/// Ascending, deduplicated set drawn from [0, max].
fn sorted_set(max: u64, size: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::btree_set(0..=max, 0..size).prop_map(|s| s.into_iter().collect())
}

fn brute_force(a: &[u64], n: u64) -> Vec<bool> {
    let mut hit = vec![false; n as usize + 1];
    for &x in a {
        for &y in a {
            if x + y <= n {
                hit[(x + y) as usize] = true;
            }
        }
    }
    hit
}

fn is_prime(v: u64) -> bool {
    v >= 2 && (2..).take_while(|d| d * d <= v).all(|d| v % d != 0)
}

fn largest_prime_factor(mut v: u64) -> u64 {
    let mut largest = 1;
    let mut d = 2;
    while d * d <= v {
        while v % d == 0 {
            largest = d;
            v /= d;
        }
        d += 1;
    }
    largest.max(if v > 1 { v } else { 1 })
}

// == Coverage ==================================================================

proptest! {
    /// All strategies return bit-identical indicators for the same (A, n).
    #[test]
    fn prop_coverage_strategies_agree(
        a in sorted_set(600, 80),
        n in 1u64..700,
        tile in 1usize..40,
        blocks in 1usize..12,
    ) {
        let strategies: Vec<Box<dyn CoverageStrategy>> = vec![
            Box::new(TwoPointer),
            Box::new(Tiled { tile }),
            Box::new(Parallel { blocks, threads: None }),
        ];
        let reference = coverage_with(&a, n, &Baseline).unwrap();
        for s in &strategies {
            let got = coverage_with(&a, n, s.as_ref()).unwrap();
            prop_assert_eq!(&got, &reference, "strategy {} disagrees", s.name());
        }
    }

    /// B[k] is set exactly when k = a + a' for some a, a' in A.
    #[test]
    fn prop_coverage_closure(
        a in sorted_set(400, 50),
        n in 1u64..500,
    ) {
        let b = coverage(&a, n, Engine::TwoPointer).unwrap();
        let expected = brute_force(&a, n);
        prop_assert_eq!(b.len(), n as usize + 1);
        for (k, &hit) in expected.iter().enumerate() {
            prop_assert_eq!(b.get(k), hit, "k = {}", k);
        }
    }

    /// Growing n keeps every previously covered k covered.
    #[test]
    fn prop_coverage_monotone_in_n(
        a in sorted_set(300, 40),
        n in 1u64..300,
        extra in 0u64..200,
    ) {
        let small = coverage(&a, n, Engine::Baseline).unwrap();
        let large = coverage(&a, n + extra, Engine::Baseline).unwrap();
        for k in small.iter_ones() {
            prop_assert!(large.get(k), "k = {} lost when n grew", k);
        }
    }
}

// == Sieve and Friables ========================================================

proptest! {
    /// The sieve returns exactly the primes up to the bound.
    #[test]
    fn prop_generate_primes_exact(limit in 0u64..3000) {
        let expected: Vec<u64> = (0..=limit).filter(|&v| is_prime(v)).collect();
        prop_assert_eq!(generate_primes(limit), expected);
    }

    /// Friables equal {1} ∪ {v ≤ n : largest prime factor ≤ y}, ascending,
    /// unique.
    #[test]
    fn prop_friables_exact(n in 0u64..3000, y in 0u64..60) {
        let got = generate_friables(n, &generate_primes(y)).unwrap();
        let expected: Vec<u64> = (1..=n)
            .filter(|&v| v == 1 || largest_prime_factor(v) <= y)
            .collect();
        prop_assert_eq!(got, expected);
    }

    /// A larger smoothness bound never increases the uncovered count.
    #[test]
    fn prop_uncovered_monotone_in_y(n in 2u64..2000, y in 2u64..40, bump in 0u64..40) {
        let count = |y: u64| {
            let a = generate_friables(n, &generate_primes(y)).unwrap();
            uncovered_indices(&coverage(&a, n, Engine::TwoPointer).unwrap(), 2).len()
        };
        prop_assert!(count(y + bump) <= count(y));
    }
}

// == Diagnostics ===============================================================

proptest! {
    /// Every histogram row sums to the number of uncovered targets.
    #[test]
    fn prop_residue_hist_consistent(
        a in sorted_set(300, 30),
        n in 2u64..600,
        qmax in 2u64..40,
    ) {
        let unc = uncovered_indices(&coverage(&a, n, Engine::TwoPointer).unwrap(), 2);
        for (q, row) in residue_hist(&unc, qmax) {
            prop_assert_eq!(row.values().sum::<usize>(), unc.len(), "q = {}", q);
        }
    }

    /// The longest run is bounded by the list length and is positive when
    /// the list is non-empty.
    #[test]
    fn prop_longest_run_bounds(values in sorted_set(200, 60)) {
        let run = longest_uncovered_run(&values);
        prop_assert!(run <= values.len());
        prop_assert_eq!(run == 0, values.is_empty());
    }
}

// == Augmentation ==============================================================

proptest! {
    /// `remaining` equals the uncovered list of A ∪ added, and every added
    /// element comes from the halo.
    #[test]
    fn prop_augment_remaining_exact(
        a in sorted_set(200, 25),
        halo in prop::collection::vec(1u64..400, 0..30),
        n in 2u64..400,
        cap in proptest::option::of(0usize..6),
    ) {
        let base = coverage(&a, n, Engine::TwoPointer).unwrap();
        let unc = uncovered_indices(&base, 2);
        let out = greedy_augment(n, &a, &unc, &halo, cap).unwrap();

        prop_assert!(out.added.iter().all(|h| halo.contains(h)));
        if let Some(cap) = cap {
            prop_assert!(out.added.len() <= cap);
        }

        let mut merged = a.clone();
        merged.extend(&out.added);
        let after = coverage(&merged, n, Engine::TwoPointer).unwrap();
        prop_assert_eq!(out.remaining, uncovered_indices(&after, 2));
    }
}
