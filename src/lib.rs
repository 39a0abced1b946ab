//! # smoothcover — Sumset Coverage of Smooth Integers
//!
//! Empirical engine for the question: does A + A cover every integer in
//! `[2, n]` when A is the set of y-smooth integers up to n, `y = (ln n)^C`?
//!
//! Stages, leaf first:
//!
//! - [`sieve`]: primes up to the smoothness bound.
//! - [`friable`]: the smooth set A (and the looser halo pool).
//! - [`thin`]: optional residue-balanced subsampling of A.
//! - [`coverage`]: the indicator of A + A over `[0, n]`, four strategies.
//! - [`diagnose`]: uncovered targets, residue histograms, longest gap.
//! - [`augment`]: greedy repair of gaps from the halo pool.
//! - [`pipeline`]: one experiment or one repair run end to end.

pub mod augment;
pub mod bitset;
pub mod config;
pub mod coverage;
pub mod diagnose;
pub mod friable;
pub mod pipeline;
pub mod sieve;
pub mod thin;

pub use augment::{greedy_augment, Augmentation};
pub use bitset::BitSet;
pub use coverage::{coverage, coverage_with, CoverageStrategy, Engine};
pub use diagnose::{longest_uncovered_run, residue_hist, uncovered_indices};
pub use friable::generate_friables;
pub use sieve::generate_primes;
pub use thin::residue_balanced_thin;
