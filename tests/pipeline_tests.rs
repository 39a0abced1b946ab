//! End-to-end scenarios over the public API.
//!
//! Fixed instances with known answers, plus the full-size n = 200000 run
//! compared across strategies. Run with:
//!
//! ```bash
//! cargo test --release --test pipeline_tests
//! ```

use smoothcover::config::{ExperimentConfig, ThinConfig};
use smoothcover::pipeline::run_experiment;
use smoothcover::sieve::smoothness_bound;
use smoothcover::{
    coverage, generate_friables, generate_primes, greedy_augment, residue_balanced_thin,
    uncovered_indices, Engine,
};

// == Fixed instances ==========================================================

#[test]
fn tiny_set_covers_two_through_six() {
    for engine in Engine::ALL {
        let b = coverage(&[1, 2, 3], 20, engine).unwrap();
        assert_eq!(b.len(), 21);
        let covered: Vec<usize> = b.iter_ones().collect();
        assert_eq!(covered, vec![2, 3, 4, 5, 6], "engine {}", engine);
    }
}

#[test]
fn empty_set_leaves_everything_uncovered() {
    for n in [1u64, 2, 17, 1000] {
        let b = coverage(&[], n, Engine::Auto).unwrap();
        assert_eq!(b.count_ones(), 0);
        assert_eq!(uncovered_indices(&b, 2).len() as u64, n - 1, "n = {}", n);
    }
}

#[test]
fn full_retention_thinning_is_lossless() {
    let a = generate_friables(50_000, &generate_primes(30)).unwrap();
    let mut shuffled = a.clone();
    shuffled.reverse();
    let kept = residue_balanced_thin(&shuffled, 64, 1.0, 7).unwrap();
    assert_eq!(kept, a);
}

#[test]
fn empty_halo_changes_nothing() {
    let n = 5_000;
    let a = generate_friables(n, &generate_primes(7)).unwrap();
    let unc = uncovered_indices(&coverage(&a, n, Engine::TwoPointer).unwrap(), 2);
    assert!(!unc.is_empty());

    let out = greedy_augment(n, &a, &unc, &[], None).unwrap();
    assert!(out.added.is_empty());
    assert_eq!(out.remaining, unc);
}

// == Full-size instance ========================================================

#[test]
fn strategies_agree_at_two_hundred_thousand() {
    let n = 200_000;
    let y = smoothness_bound(n, 2.0);
    assert_eq!(y, 148);

    let a = generate_friables(n, &generate_primes(y)).unwrap();
    let baseline = coverage(&a, n, Engine::Baseline).unwrap();
    let reference = uncovered_indices(&baseline, 2);

    for engine in [Engine::TwoPointer, Engine::Tiled, Engine::Parallel] {
        let b = coverage(&a, n, engine).unwrap();
        assert_eq!(b, baseline, "engine {}", engine);
        assert_eq!(uncovered_indices(&b, 2), reference);
    }

    let report = run_experiment(&ExperimentConfig {
        engine: Engine::TwoPointer,
        ..ExperimentConfig::new(n, 2.0)
    })
    .unwrap();
    assert_eq!(report.y, y);
    assert_eq!(report.a_size, a.len());
    assert_eq!(report.gaps.uncovered, reference.len());
}

#[test]
fn thinned_experiment_reports_both_sizes() {
    let config = ExperimentConfig {
        thin: Some(ThinConfig {
            keep_ratio: 0.6,
            ..ThinConfig::default()
        }),
        ..ExperimentConfig::new(30_000, 2.0)
    };
    let report = run_experiment(&config).unwrap();
    assert!(report.a_used < report.a_size);
    assert!(report.a_used > 0);

    // Same seed, same subset.
    let again = run_experiment(&config).unwrap();
    assert_eq!(again.a_used, report.a_used);
    assert_eq!(again.gaps, report.gaps);
}
