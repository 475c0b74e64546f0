use super::{experience::Experience, mdp::*};
use crate::common::{defs::*, utils::*};
use crate::error::Result;
use itertools::iproduct;
use ndarray::{s, Array3};
use rand::prelude::*;
use std::sync::Mutex;

/// Maximum likelihood MDP estimated from an `Experience`.
///
/// Transition probabilities are visit frequencies and rewards are the
/// average reward observed per transition. Pairs that were never visited
/// are kept self-absorbing so the model stays a valid MDP.
#[derive(Debug)]
pub struct RlModel {
    n_s: usize,
    n_a: usize,
    discount: f64,
    experience: Experience,
    transitions: Table3D,
    rewards: Table3D,
    rng: Mutex<StdRng>,
}

impl RlModel {
    pub fn new(experience: Experience, discount: f64, to_sync: bool, seed: u64) -> Result<Self> {
        let (n_s, n_a) = (experience.n_s(), experience.n_a());
        let mut m = Self {
            n_s,
            n_a,
            discount: check_discount(discount)?,
            experience,
            transitions: Array3::zeros((n_s, n_a, n_s)),
            rewards: Array3::zeros((n_s, n_a, n_s)),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        };

        if to_sync {
            m.sync();
        }
        for (s, a) in iproduct!(0..n_s, 0..n_a) {
            if !to_sync || m.experience.visits_sum(s, a) == 0 {
                m.transitions[[s, a, s]] = 1.;
            }
        }

        Ok(m)
    }

    pub fn set_discount(&mut self, d: f64) -> Result<()> {
        self.discount = check_discount(d)?;

        Ok(())
    }

    /// Records a transition into the owned experience without syncing.
    pub fn record(&mut self, s: usize, a: usize, s1: usize, r: f64) {
        self.experience.record(s, a, s1, r);
    }

    pub fn sync(&mut self) {
        for (s, a) in iproduct!(0..self.n_s, 0..self.n_a) {
            self.sync_pair(s, a);
        }
    }

    /// Recomputes the whole `(s, a)` row from the experience.
    pub fn sync_pair(&mut self, s: usize, a: usize) {
        let visit_sum = self.experience.visits_sum(s, a);
        if visit_sum == 0 {
            return;
        }

        let reciprocal = 1. / visit_sum as f64;
        for s1 in 0..self.n_s {
            let visits = self.experience.visits(s, a, s1);
            if visits != 0 {
                self.rewards[[s, a, s1]] = self.experience.reward(s, a, s1) / visits as f64;
            }
            self.transitions[[s, a, s1]] = visits as f64 * reciprocal;
        }
    }

    /// Incremental update after a single new `(s, a, s1)` visit was recorded.
    ///
    /// Falls back to a full row sync on the first visits and every 10000
    /// visits, which resets the accumulated rounding error.
    pub fn sync_transition(&mut self, s: usize, a: usize, s1: usize) {
        let visit_sum = self.experience.visits_sum(s, a);
        if visit_sum < 2 || visit_sum % 10000 == 0 {
            return self.sync_pair(s, a);
        }

        let new_visits = self.experience.visits(s, a, s1) as f64;
        self.rewards[[s, a, s1]] = self.experience.reward(s, a, s1) / new_visits;

        // The row keeps the denominator (visit_sum - 1); renormalizing fixes it.
        let new_transition = new_visits / (visit_sum - 1) as f64;
        let new_row_sum = 1. + (new_transition - self.transitions[[s, a, s1]]);
        self.transitions[[s, a, s1]] = new_transition;
        self.transitions
            .slice_mut(s![s, a, ..])
            .mapv_inplace(|p| p / new_row_sum);
    }

    pub fn is_terminal(&self, s: usize) -> bool {
        (0..self.n_a).all(|a| check_equal_small(1., self.transitions[[s, a, s]]))
    }

    pub fn experience(&self) -> &Experience {
        &self.experience
    }

    pub fn transition_function(&self) -> &Table3D {
        &self.transitions
    }

    pub fn reward_function(&self) -> &Table3D {
        &self.rewards
    }
}

impl Mdp for RlModel {
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

impl GenerativeMdp for RlModel {
    fn sample(&self, s: usize, a: usize) -> (usize, f64) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let s1 = sample_probability(self.transitions.slice(s![s, a, ..]), &mut *rng);

        (s1, self.rewards[[s, a, s1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;

    #[test]
    fn unvisited_pairs_are_self_absorbing() {
        let mut exp = Experience::new(3, 2);
        exp.record(0, 0, 1, 1.);
        exp.record(0, 0, 2, 3.);

        let m = RlModel::new(exp, 0.9, true, 0).unwrap();
        assert_float_eq!(m.transition_probability(0, 0, 1), 0.5, abs <= 1e-12);
        assert_float_eq!(m.transition_probability(0, 0, 2), 0.5, abs <= 1e-12);
        assert_float_eq!(m.expected_reward(0, 0, 2), 3., abs <= 1e-12);
        assert_eq!(m.transition_probability(0, 1, 0), 1.);
        assert!(m.is_terminal(1));
        assert!(!m.is_terminal(0));
    }

    #[test]
    fn unsynced_model_is_identity() {
        let mut exp = Experience::new(2, 1);
        exp.record(0, 0, 1, 1.);

        let m = RlModel::new(exp, 1., false, 0).unwrap();
        assert_eq!(m.transition_probability(0, 0, 0), 1.);
        assert_eq!(m.transition_probability(0, 0, 1), 0.);
    }

    #[test]
    fn incremental_sync_matches_full_sync() {
        let mut incremental = RlModel::new(Experience::new(3, 1), 0.9, false, 0).unwrap();
        let visits = [(0, 1, 1.), (0, 2, 0.), (0, 1, 3.), (0, 0, -1.), (0, 1, 2.)];
        for &(s, s1, r) in &visits {
            incremental.record(s, 0, s1, r);
            incremental.sync_transition(s, 0, s1);
        }

        let mut full = RlModel::new(incremental.experience().clone(), 0.9, true, 0).unwrap();
        full.sync();

        for s1 in 0..3 {
            assert_float_eq!(
                incremental.transition_probability(0, 0, s1),
                full.transition_probability(0, 0, s1),
                abs <= 1e-12
            );
            assert_float_eq!(
                incremental.expected_reward(0, 0, s1),
                full.expected_reward(0, 0, s1),
                abs <= 1e-12
            );
        }
        assert_float_eq!(incremental.transition_probability(0, 0, 1), 0.6, abs <= 1e-12);
    }

    #[test]
    fn invalid_discount_is_rejected() {
        assert!(RlModel::new(Experience::new(1, 1), 0., false, 0).is_err());
    }
}
