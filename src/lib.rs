//! Exact and point-based solvers for finite POMDPs.
//!
//! Value functions are sets of alpha vectors (`pomdps::VEntry`), one set per
//! horizon. `algos::model_based::pomdp::IncrementalPruning` computes them
//! exactly; `algos::model_based::pomdp::Pbvi` approximates them on a sample
//! of beliefs.

pub mod algos;
pub mod common;
pub mod config;
pub mod envs;
pub mod error;
pub mod mdps;
pub mod pomdps;

pub use algos::model_based::pomdp::{IncrementalPruning, Pbvi};
pub use config::SolverConfig;
pub use error::{Error, Result};
