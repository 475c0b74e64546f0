use super::mdp::*;
use crate::common::{defs::*, utils::*};
use crate::error::{Error, Result};
use itertools::iproduct;
use ndarray::{s, Array3};
use rand::prelude::*;
use std::sync::Mutex;

/// Tabular MDP with dense transition and reward tables indexed `[s, a, s1]`.
#[derive(Debug)]
pub struct Model {
    n_s: usize,
    n_a: usize,
    discount: f64,
    transitions: Table3D,
    rewards: Table3D,
    rng: Mutex<StdRng>,
}

impl Model {
    /// Every action is self-absorbing and every reward is zero.
    pub fn new(n_s: usize, n_a: usize, discount: f64, seed: u64) -> Result<Self> {
        let mut transitions = Array3::zeros((n_s, n_a, n_s));
        for (s, a) in iproduct!(0..n_s, 0..n_a) {
            transitions[[s, a, s]] = 1.;
        }

        Ok(Self {
            n_s,
            n_a,
            discount: check_discount(discount)?,
            transitions,
            rewards: Array3::zeros((n_s, n_a, n_s)),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    pub fn from_tables(
        transitions: Table3D,
        rewards: Table3D,
        discount: f64,
        seed: u64,
    ) -> Result<Self> {
        let (n_s, n_a, _) = transitions.dim();
        let mut m = Self::new(n_s, n_a, discount, seed)?;
        m.set_transition_function(transitions)?;
        m.set_reward_function(rewards)?;

        Ok(m)
    }

    /// Replaces the transition table. The old table is kept if the new one is invalid.
    pub fn set_transition_function(&mut self, transitions: Table3D) -> Result<()> {
        check_shape("transition table", &transitions, [self.n_s, self.n_a, self.n_s])?;
        check_probability_rows("transition table", &transitions)?;
        self.transitions = transitions;

        Ok(())
    }

    pub fn set_reward_function(&mut self, rewards: Table3D) -> Result<()> {
        check_shape("reward table", &rewards, [self.n_s, self.n_a, self.n_s])?;
        self.rewards = rewards;

        Ok(())
    }

    pub fn set_discount(&mut self, d: f64) -> Result<()> {
        self.discount = check_discount(d)?;

        Ok(())
    }

    pub fn transition_function(&self) -> &Table3D {
        &self.transitions
    }

    pub fn reward_function(&self) -> &Table3D {
        &self.rewards
    }

    /// A state is terminal when every action keeps the agent in it.
    pub fn is_terminal(&self, s: usize) -> bool {
        (0..self.n_a).all(|a| check_equal_small(1., self.transitions[[s, a, s]]))
    }
}

impl Mdp for Model {
    fn n_s(&self) -> usize {
        self.n_s
    }

    fn n_a(&self) -> usize {
        self.n_a
    }

    fn discount(&self) -> f64 {
        self.discount
    }

    fn transition_probability(&self, s: usize, a: usize, s1: usize) -> f64 {
        self.transitions[[s, a, s1]]
    }

    fn expected_reward(&self, s: usize, a: usize, s1: usize) -> f64 {
        self.rewards[[s, a, s1]]
    }
}

impl GenerativeMdp for Model {
    fn sample(&self, s: usize, a: usize) -> (usize, f64) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let s1 = sample_probability(self.transitions.slice(s![s, a, ..]), &mut *rng);

        (s1, self.rewards[[s, a, s1]])
    }
}

pub(crate) fn check_shape(what: &str, table: &Table3D, expected: [usize; 3]) -> Result<()> {
    let (d0, d1, d2) = table.dim();
    if [d0, d1, d2] != expected {
        return Err(Error::DimensionMismatch {
            what: what.to_string(),
            expected: expected.to_vec(),
            got: vec![d0, d1, d2],
        });
    }

    Ok(())
}

/// Every `[i, j, ..]` row of the table must be a distribution.
pub(crate) fn check_probability_rows(what: &str, table: &Table3D) -> Result<()> {
    let (d0, d1, _) = table.dim();
    for i in 0..d0 {
        for j in 0..d1 {
            if !is_probability(table.slice(s![i, j, ..])) {
                return Err(Error::InvalidProbability {
                    table: what.to_string(),
                    row: vec![i, j],
                });
            }
        }
    }

    Ok(())
}
