//! Run configuration: typed structs, TOML loading, and validation.
//!
//! An experiment TOML looks like:
//!
//! ```toml
//! n = 1000000
//! c = 2.0
//! engine = "parallel"
//!
//! [thin]
//! keep_ratio = 0.8
//! ```
//!
//! Every field except `n` has a default. The coverage engine is always an
//! explicit field; nothing here reads the process environment.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::coverage::Engine;
use crate::diagnose::DEFAULT_START;
use crate::thin::{DEFAULT_QMAX_THIN, DEFAULT_SEED};

fn default_c() -> f64 {
    2.0
}

fn default_augment_c() -> f64 {
    1.4
}

fn default_c_bump() -> f64 {
    0.05
}

fn default_start() -> u64 {
    DEFAULT_START
}

fn default_qmax() -> u64 {
    64
}

fn default_qmax_thin() -> u64 {
    DEFAULT_QMAX_THIN
}

fn default_keep_ratio() -> f64 {
    1.0
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// A single coverage experiment: A = y-smooth integers up to n with
/// y = ⌊(ln n)^c⌋, optionally thinned, then diagnosed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    pub n: u64,
    #[serde(default = "default_c")]
    pub c: f64,
    /// Lower bound of uncovered reporting.
    #[serde(default = "default_start")]
    pub start: u64,
    /// Residue histogram up to this modulus.
    #[serde(default = "default_qmax")]
    pub qmax: u64,
    /// Treat 0 as smooth (adds 0 to A).
    #[serde(default)]
    pub include_zero: bool,
    #[serde(default)]
    pub thin: Option<ThinConfig>,
    #[serde(default)]
    pub engine: Engine,
}

/// The `[thin]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThinConfig {
    #[serde(default = "default_qmax_thin")]
    pub qmax_thin: u64,
    #[serde(default = "default_keep_ratio")]
    pub keep_ratio: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ThinConfig {
    fn default() -> Self {
        ThinConfig {
            qmax_thin: default_qmax_thin(),
            keep_ratio: default_keep_ratio(),
            seed: default_seed(),
        }
    }
}

/// A single repair run: A at exponent `c`, halo at `c + c_bump`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AugmentConfig {
    pub n: u64,
    #[serde(default = "default_augment_c")]
    pub c: f64,
    #[serde(default = "default_c_bump")]
    pub c_bump: f64,
    #[serde(default = "default_start")]
    pub start: u64,
    #[serde(default)]
    pub max_add: Option<usize>,
    #[serde(default)]
    pub engine: Engine,
}

impl ExperimentConfig {
    pub fn new(n: u64, c: f64) -> Self {
        ExperimentConfig {
            n,
            c,
            start: default_start(),
            qmax: default_qmax(),
            include_zero: false,
            thin: None,
            engine: Engine::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("invalid experiment TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        validate_exponent("c", self.c)?;
        ensure!(self.qmax >= 2, "qmax must be at least 2, got {}", self.qmax);
        if let Some(thin) = &self.thin {
            thin.validate()?;
        }
        Ok(())
    }
}

impl ThinConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.keep_ratio.is_finite() && self.keep_ratio > 0.0 && self.keep_ratio <= 1.0,
            "keep_ratio must be in (0, 1], got {}",
            self.keep_ratio
        );
        ensure!(
            self.qmax_thin >= 2,
            "qmax_thin must be at least 2, got {}",
            self.qmax_thin
        );
        Ok(())
    }
}

impl AugmentConfig {
    pub fn new(n: u64, c: f64, c_bump: f64) -> Self {
        AugmentConfig {
            n,
            c,
            c_bump,
            start: default_start(),
            max_add: None,
            engine: Engine::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("invalid augment TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        validate_exponent("c", self.c)?;
        ensure!(
            self.c_bump.is_finite() && self.c_bump >= 0.0,
            "c_bump must be finite and non-negative, got {}",
            self.c_bump
        );
        Ok(())
    }
}

fn validate_exponent(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{} must be finite and positive, got {}",
        name,
        value
    );
    Ok(())
}
