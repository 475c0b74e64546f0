//! Error types for the solver crate

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("epsilon must be >= 0, got {value}")]
    InvalidEpsilon { value: f64 },

    #[error("discount must be in (0,1], got {value}")]
    InvalidDiscount { value: f64 },

    #[error("learning rate must be in (0,1], got {value}")]
    InvalidLearningRate { value: f64 },

    #[error("exploration probability must be in [0,1], got {value}")]
    InvalidExploration { value: f64 },

    #[error("{table} row {row:?} does not contain valid probabilities")]
    InvalidProbability { table: String, row: Vec<usize> },

    #[error("{what} has shape {got:?}, expected {expected:?}")]
    DimensionMismatch {
        what: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("could not read {what}: {message} (token {token})")]
    Parse {
        what: String,
        token: usize,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
