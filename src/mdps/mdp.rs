use crate::common::defs::*;
use crate::error::{Error, Result};
use ndarray::Array2;

/// Markov Decision Process - Sutton & Barto 2018.
pub trait Mdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    fn discount(&self) -> f64;

    fn transition_probability(&self, s: usize, a: usize, s1: usize) -> f64;

    fn expected_reward(&self, s: usize, a: usize, s1: usize) -> f64;

    /// Reward expected from taking `a` in `s`, before knowing the successor.
    fn immediate_reward(&self, s: usize, a: usize) -> f64 {
        (0..self.n_s())
            .map(|s1| self.transition_probability(s, a, s1) * self.expected_reward(s, a, s1))
            .sum()
    }

    /// `[s, a]` matrix of immediate rewards.
    fn immediate_rewards(&self) -> Matrix2D {
        Array2::from_shape_fn((self.n_s(), self.n_a()), |(s, a)| {
            self.immediate_reward(s, a)
        })
    }
}

pub trait GenerativeMdp: Mdp {
    /// Samples a successor state and the reward of the transition.
    fn sample(&self, s: usize, a: usize) -> (usize, f64);
}

pub(crate) fn check_discount(d: f64) -> Result<f64> {
    if d <= 0. || d > 1. || d.is_nan() {
        return Err(Error::InvalidDiscount { value: d });
    }

    Ok(d)
}
