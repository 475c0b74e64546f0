//! Solver configuration.
//!
//! A `SolverConfig` picks the algorithm and its parameters, so a run can be
//! tuned from a TOML file without code changes:
//!
//! ```
//! use pomdp_solver::config::{Algorithm, SolverConfig};
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     algorithm = "pbvi"
//!     horizon = 20
//!     belief_size = 64
//!
//!     [prune]
//!     strategy = "pairwise"
//! "#).unwrap();
//!
//! assert_eq!(config.algorithm, Algorithm::Pbvi);
//! assert_eq!(config.epsilon, 0.);
//! ```

use crate::algos::model_based::pomdp::{PairwisePrune, Pruner, WitnessPrune};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    pub algorithm: Algorithm,

    /// Number of horizons to solve.
    pub horizon: usize,

    /// Convergence tolerance between consecutive horizons.
    pub epsilon: f64,

    /// Beliefs sampled by point-based solvers.
    pub belief_size: usize,

    /// Seed for belief sampling and for the benchmark models.
    pub seed: u64,

    pub prune: PruneConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            horizon: 10,
            epsilon: 0.,
            belief_size: 100,
            seed: 0,
            prune: PruneConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.epsilon < 0. || self.epsilon.is_nan() {
            return Err(Error::InvalidEpsilon {
                value: self.epsilon,
            });
        }
        if self.belief_size == 0 {
            return Err(invalid("belief_size must be at least 1"));
        }
        if self.prune.tolerance <= 0. || self.prune.tolerance.is_nan() {
            return Err(invalid("prune.tolerance must be positive"));
        }

        Ok(())
    }

    pub fn pruner(&self) -> Pruner {
        match self.prune.strategy {
            PruneStrategy::Pairwise => Pruner::Pairwise(PairwisePrune),
            PruneStrategy::Witness => Pruner::Witness(WitnessPrune::new(self.prune.tolerance)),
        }
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfiguration {
        message: message.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    IncrementalPruning,
    Pbvi,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PruneConfig {
    pub strategy: PruneStrategy,

    /// Minimum advantage a witness belief must show. Ignored by `pairwise`.
    pub tolerance: f64,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            strategy: PruneStrategy::default(),
            tolerance: WitnessPrune::DEFAULT_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PruneStrategy {
    #[default]
    Witness,
    Pairwise,
}
