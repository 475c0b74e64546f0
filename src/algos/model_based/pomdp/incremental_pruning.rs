//! Exact finite-horizon POMDP solver by Incremental Pruning
//! (Cassandra, Littman & Zhang 1997).

use super::common::*;
use super::prune::*;
use crate::algos::check_epsilon;
use crate::common::defs::Matrix2D;
use crate::config::SolverConfig;
use crate::error::Result;
use crate::pomdps::{pomdp::Pomdp, types::*, utils::*};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, trace};

/// Computes the value function of a POMDP one horizon at a time.
///
/// Each step projects the previous horizon through every `(a, o)` pair and
/// merges the observation branches of an action with `cross_sum`, pruning
/// after every merge. Per-action work runs on the rayon pool.
#[derive(Debug, Clone)]
pub struct IncrementalPruning<P = WitnessPrune> {
    horizon: usize,
    epsilon: f64,
    pruner: P,
}

impl IncrementalPruning<WitnessPrune> {
    /// `horizon` is the number of steps to plan for. Iteration stops early
    /// once two consecutive horizons are within `epsilon` of each other.
    pub fn new(horizon: usize, epsilon: f64) -> Result<Self> {
        Ok(Self {
            horizon,
            epsilon: check_epsilon(epsilon)?,
            pruner: WitnessPrune::default(),
        })
    }
}

impl IncrementalPruning<Pruner> {
    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            horizon: config.horizon,
            epsilon: config.epsilon,
            pruner: config.pruner(),
        })
    }
}

impl<P: Prune> IncrementalPruning<P> {
    pub fn with_pruner<Q: Prune>(self, pruner: Q) -> IncrementalPruning<Q> {
        IncrementalPruning {
            horizon: self.horizon,
            epsilon: self.epsilon,
            pruner,
        }
    }

    pub fn set_horizon(&mut self, horizon: usize) {
        self.horizon = horizon;
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        self.epsilon = check_epsilon(epsilon)?;
        Ok(())
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn pruner(&self) -> &P {
        &self.pruner
    }
}

impl<P: Prune + Sync> IncrementalPruning<P> {
    /// Returns whether the value function converged before the horizon ran
    /// out, and the value function itself, one `VList` per solved horizon.
    pub fn solve<M: Pomdp + Sync>(&self, model: &M) -> (bool, ValueFunction) {
        let (n_s, n_a, n_o) = (model.n_s(), model.n_a(), model.n_o());
        let started = Instant::now();
        info!(
            event = "solve_start",
            solver = "incremental_pruning",
            horizon = self.horizon,
            epsilon = self.epsilon,
            states = n_s,
            actions = n_a,
            observations = n_o,
        );

        let immediate = model.immediate_rewards();
        let mut vf = make_value_function(n_s, n_o);
        let mut converged = false;
        for t in 1..=self.horizon {
            let prev = &vf[t - 1];

            let per_action: Vec<VList> = (0..n_a)
                .into_par_iter()
                .map(|a| self.backup_action(model, &immediate, prev, a))
                .collect();
            for (a, list) in per_action.iter().enumerate() {
                trace!(event = "action_backup", horizon = t, action = a, vectors = list.len());
            }

            let candidates: VList = per_action.into_iter().flatten().collect();
            let n_candidates = candidates.len();
            let next = self.pruner.prune(candidates);
            let variation = weak_bound_distance(prev, &next);
            debug!(
                event = "horizon_end",
                horizon = t,
                candidates = n_candidates,
                vectors = next.len(),
                variation,
            );

            vf.push(next);
            if variation <= self.epsilon {
                converged = true;
                break;
            }
        }

        info!(
            event = "solve_end",
            solver = "incremental_pruning",
            horizons = vf.len() - 1,
            vectors = vf.last().map_or(0, |l| l.len()),
            converged,
            duration_ms = started.elapsed().as_millis() as u64,
        );
        (converged, vf)
    }

    /// All the useful vectors that start with action `a`.
    fn backup_action<M: Pomdp>(
        &self,
        model: &M,
        immediate: &Matrix2D,
        prev: &[VEntry],
        a: usize,
    ) -> VList {
        let mut blocks: Vec<VList> = (0..model.n_o())
            .map(|o| self.pruner.prune(project(model, immediate, prev, a, o)))
            .collect();

        // Adjacent blocks are merged pairwise so observation maps stay in order.
        while blocks.len() > 1 {
            let mut merged = Vec::with_capacity((blocks.len() + 1) / 2);
            let mut it = blocks.into_iter();
            while let Some(left) = it.next() {
                match it.next() {
                    Some(right) => merged.push(self.pruner.prune(merge(&left, &right, a))),
                    None => merged.push(left),
                }
            }
            blocks = merged;
        }

        blocks.pop().unwrap_or_default()
    }
}

/// Cross-sum of two adjacent observation blocks, iterating over the larger one.
fn merge(left: &[VEntry], right: &[VEntry], a: usize) -> VList {
    if left.len() >= right.len() {
        cross_sum(left, right, a, true)
    } else {
        cross_sum(right, left, a, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::tiger::*;
    use crate::error::Error;
    use float_eq::*;
    use ndarray::array;

    #[test]
    fn negative_epsilon_is_rejected() {
        assert!(matches!(
            IncrementalPruning::new(3, -0.1),
            Err(Error::InvalidEpsilon { .. })
        ));

        let mut ip = IncrementalPruning::new(3, 0.).unwrap();
        assert!(ip.set_epsilon(-1.).is_err());
        assert_eq!(ip.epsilon(), 0.);
        ip.set_horizon(7);
        assert_eq!(ip.horizon(), 7);
    }

    #[test]
    fn horizon_zero_returns_base_case() {
        let model = tiger(0).unwrap();
        let (converged, vf) = IncrementalPruning::new(0, 0.).unwrap().solve(&model);

        assert!(!converged);
        assert_eq!(vf, make_value_function(2, 2));
    }

    #[test]
    fn tiger_horizon_one_is_the_immediate_rewards() {
        let model = tiger(0).unwrap();
        let (_, vf) = IncrementalPruning::new(1, 0.).unwrap().solve(&model);

        assert_eq!(vf.len(), 2);
        let values: Vec<_> = vf[1].iter().map(|e| (e.action, e.values.clone())).collect();
        assert_eq!(values.len(), 3);
        assert!(values.contains(&(LISTEN, array![-1., -1.])));
        assert!(values.contains(&(OPEN_LEFT, array![-100., 10.])));
        assert!(values.contains(&(OPEN_RIGHT, array![10., -100.])));
        assert!(vf[1].iter().all(|e| e.observations == vec![0, 0]));
    }

    #[test]
    fn tiger_horizon_two_value_at_uniform_belief() {
        let model = tiger(0).unwrap();
        let (_, vf) = IncrementalPruning::new(2, 0.).unwrap().solve(&model);

        let b = array![0.5, 0.5];
        let (id, value) = best_vector(&b, &vf[2]).unwrap();
        // Listen twice is worth -1 - 0.95 at the uniform belief.
        assert_eq!(vf[2][id].action, LISTEN);
        assert_float_eq!(value, -1.95, abs <= 1e-9);
    }

    #[test]
    fn pruners_agree_on_the_envelope() {
        let model = tiger(0).unwrap();
        let (_, exact) = IncrementalPruning::new(3, 0.).unwrap().solve(&model);
        let (_, loose) = IncrementalPruning::new(3, 0.)
            .unwrap()
            .with_pruner(PairwisePrune)
            .solve(&model);

        assert!(loose[3].len() >= exact[3].len());
        for i in 0..=20 {
            let p = i as f64 / 20.;
            let b = array![p, 1. - p];
            let e = best_vector(&b, &exact[3]).unwrap().1;
            let l = best_vector(&b, &loose[3]).unwrap().1;
            assert_float_eq!(e, l, abs <= 1e-9);
        }
    }

    #[test]
    fn observation_maps_point_into_previous_horizon() {
        let model = tiger(0).unwrap();
        let (_, vf) = IncrementalPruning::new(4, 0.).unwrap().solve(&model);

        for t in 1..vf.len() {
            for e in &vf[t] {
                assert_eq!(e.observations.len(), 2);
                assert!(e.observations.iter().all(|&i| i < vf[t - 1].len()));
            }
        }
    }

    #[test]
    fn converges_on_absorbing_model() {
        // A single self-absorbing state with no reward has a fixed point at zero.
        let mdp = crate::mdps::Model::new(1, 2, 0.9, 0).unwrap();
        let model = crate::pomdps::Model::new(1, mdp, 0);
        let (converged, vf) = IncrementalPruning::new(50, 0.).unwrap().solve(&model);

        assert!(converged);
        assert_eq!(vf.len(), 2);
    }
}
