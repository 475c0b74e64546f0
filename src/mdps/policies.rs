use crate::common::defs::*;
use crate::error::{Error, Result};
use rand::prelude::*;
use std::sync::Mutex;

/// Acts greedily with respect to a `QFunction`.
#[derive(Debug, Clone, Copy)]
pub struct QGreedyPolicy<'a> {
    q: &'a QFunction,
}

impl<'a> QGreedyPolicy<'a> {
    pub fn new(q: &'a QFunction) -> Self {
        Self { q }
    }

    /// Argmax of `q[s, ..]`, lowest action on ties.
    pub fn greedy_action(&self, s: usize) -> usize {
        let mut best = 0;
        for (a, &x) in self.q.row(s).iter().enumerate() {
            if x > self.q[[s, best]] {
                best = a;
            }
        }

        best
    }
}

impl Policy<usize, usize> for QGreedyPolicy<'_> {
    fn policy(&self, s: &usize) -> usize {
        self.greedy_action(*s)
    }
}

/// With probability `epsilon` picks a uniformly random action, otherwise
/// defers to the wrapped policy.
#[derive(Debug)]
pub struct EpsilonPolicy<P> {
    policy: P,
    n_a: usize,
    epsilon: f64,
    rng: Mutex<StdRng>,
}

impl<P> EpsilonPolicy<P> {
    pub fn new(policy: P, n_a: usize, epsilon: f64, seed: u64) -> Result<Self> {
        Ok(Self {
            policy,
            n_a,
            epsilon: check_exploration(epsilon)?,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        self.epsilon = check_exploration(epsilon)?;
        Ok(())
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn inner(&self) -> &P {
        &self.policy
    }
}

impl<S, P: Policy<S, usize>> Policy<S, usize> for EpsilonPolicy<P> {
    fn policy(&self, s: &S) -> usize {
        {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            if self.n_a > 0 && rng.gen_bool(self.epsilon) {
                return rng.gen_range(0..self.n_a);
            }
        }

        self.policy.policy(s)
    }
}

fn check_exploration(epsilon: f64) -> Result<f64> {
    if !(0. ..=1.).contains(&epsilon) {
        return Err(Error::InvalidExploration { value: epsilon });
    }

    Ok(epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use ndarray::array;

    #[test]
    fn greedy_picks_lowest_best_action() {
        let q = array![[0., 3., 3.], [-1., -2., -0.5]];
        let p = QGreedyPolicy::new(&q);

        assert_eq!(p.policy(&0), 1);
        assert_eq!(p.policy(&1), 2);
    }

    #[test]
    fn epsilon_zero_is_the_wrapped_policy() {
        let q = array![[0., 1.]];
        let p = EpsilonPolicy::new(QGreedyPolicy::new(&q), 2, 0., 0).unwrap();

        assert!((0..100).all(|_| p.policy(&0) == 1));
    }

    #[test]
    fn epsilon_explores_uniformly() {
        let q = array![[1., 0., 0., 0.]];
        let p = EpsilonPolicy::new(QGreedyPolicy::new(&q), 4, 0.4, 17).unwrap();

        let n = 20000;
        let greedy = (0..n).filter(|_| p.policy(&0) == 0).count();
        // 0.6 greedy plus a quarter of the random picks.
        assert_float_eq!(greedy as f64 / n as f64, 0.7, abs <= 2e-2);
    }

    #[test]
    fn invalid_exploration_is_rejected() {
        let q = array![[1.]];
        assert!(EpsilonPolicy::new(QGreedyPolicy::new(&q), 1, 1.5, 0).is_err());
        assert!(EpsilonPolicy::new(QGreedyPolicy::new(&q), 1, f64::NAN, 0).is_err());
    }
}
