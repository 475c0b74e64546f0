use crate::common::defs::*;
use crate::error::{Error, Result};
use crate::mdps::mdp::{check_discount, Mdp};
use ndarray::Array2;

/// On-policy temporal difference control - Sutton & Barto 2018, section 6.4.
///
/// After every step `(s, a, r, s1, a1)` the estimate is moved towards
/// `r + gamma * q[s1, a1]` by `learning_rate`.
#[derive(Debug, Clone)]
pub struct Sarsa {
    q: QFunction,
    discount: f64,
    learning_rate: f64,
}

impl Sarsa {
    pub fn new(n_s: usize, n_a: usize, discount: f64, learning_rate: f64) -> Result<Self> {
        Ok(Self {
            q: Array2::zeros((n_s, n_a)),
            discount: check_discount(discount)?,
            learning_rate: check_learning_rate(learning_rate)?,
        })
    }

    /// Takes sizes and discount from `model`.
    pub fn from_model<M: Mdp>(model: &M, learning_rate: f64) -> Result<Self> {
        Self::new(model.n_s(), model.n_a(), model.discount(), learning_rate)
    }

    pub fn step_update(&mut self, s: usize, a: usize, s1: usize, r: f64, a1: usize) {
        let target = r + self.discount * self.q[[s1, a1]];
        self.q[[s, a]] += self.learning_rate * (target - self.q[[s, a]]);
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        self.learning_rate = check_learning_rate(learning_rate)?;
        Ok(())
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_discount(&mut self, discount: f64) -> Result<()> {
        self.discount = check_discount(discount)?;
        Ok(())
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn q_function(&self) -> &QFunction {
        &self.q
    }

    pub fn set_q_function(&mut self, q: QFunction) -> Result<()> {
        if q.dim() != self.q.dim() {
            return Err(Error::DimensionMismatch {
                what: "q function".to_string(),
                expected: vec![self.q.nrows(), self.q.ncols()],
                got: vec![q.nrows(), q.ncols()],
            });
        }
        self.q = q;

        Ok(())
    }
}

fn check_learning_rate(lr: f64) -> Result<f64> {
    if lr <= 0. || lr > 1. || lr.is_nan() {
        return Err(Error::InvalidLearningRate { value: lr });
    }

    Ok(lr)
}
