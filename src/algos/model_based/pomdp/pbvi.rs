//! Point-based value iteration (Pineau, Gordon & Thrun 2003).

use super::common::*;
use super::prune::{PairwisePrune, Prune};
use crate::algos::check_epsilon;
use crate::common::defs::*;
use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::pomdps::{belief::BeliefGenerator, pomdp::*, types::*, utils::*};
use ndarray::Array1;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Approximate solver that only backs up a finite set of beliefs.
///
/// Each horizon holds at most one vector per belief, so the cost of a step
/// grows with `belief_size` instead of with the cross-product of
/// observations.
#[derive(Debug, Clone)]
pub struct Pbvi {
    belief_size: usize,
    horizon: usize,
    epsilon: f64,
    seed: u64,
}

impl Pbvi {
    pub fn new(belief_size: usize, horizon: usize, epsilon: f64) -> Result<Self> {
        Ok(Self {
            belief_size: check_belief_size(belief_size)?,
            horizon,
            epsilon: check_epsilon(epsilon)?,
            seed: 0,
        })
    }

    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self::new(config.belief_size, config.horizon, config.epsilon)?.with_seed(config.seed))
    }

    /// Seed of the generator used by `solve` to sample beliefs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn set_belief_size(&mut self, belief_size: usize) -> Result<()> {
        self.belief_size = check_belief_size(belief_size)?;
        Ok(())
    }

    pub fn set_horizon(&mut self, horizon: usize) {
        self.horizon = horizon;
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        self.epsilon = check_epsilon(epsilon)?;
        Ok(())
    }

    pub fn belief_size(&self) -> usize {
        self.belief_size
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Samples `belief_size` reachable beliefs and solves on them.
    pub fn solve<M: GenerativePomdp + Sync>(&self, model: &M) -> (bool, ValueFunction) {
        let beliefs = BeliefGenerator::new(model, self.seed).generate(self.belief_size);
        self.solve_with_beliefs(model, &beliefs)
    }

    pub fn solve_with_beliefs<M: Pomdp + Sync>(
        &self,
        model: &M,
        beliefs: &[Belief],
    ) -> (bool, ValueFunction) {
        let (n_s, n_o) = (model.n_s(), model.n_o());
        let started = Instant::now();
        info!(
            event = "solve_start",
            solver = "pbvi",
            horizon = self.horizon,
            epsilon = self.epsilon,
            beliefs = beliefs.len(),
            states = n_s,
            actions = model.n_a(),
            observations = n_o,
        );

        let immediate = model.immediate_rewards();
        let mut vf = make_value_function(n_s, n_o);
        let mut converged = false;
        for t in 1..=self.horizon {
            let prev = &vf[t - 1];
            let projections = project_all(model, &immediate, prev);

            let backed_up: VList = beliefs
                .par_iter()
                .filter_map(|b| backup(b, &projections, n_s))
                .collect();
            let next = PairwisePrune.prune(backed_up);
            let variation = weak_bound_distance(prev, &next);
            debug!(
                event = "horizon_end",
                horizon = t,
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
            solver = "pbvi",
            horizons = vf.len() - 1,
            vectors = vf.last().map_or(0, |l| l.len()),
            converged,
            duration_ms = started.elapsed().as_millis() as u64,
        );
        (converged, vf)
    }
}

/// Best one-step backup at `b`: for every action, the best projection per
/// observation summed together; then the best action, lowest on ties.
fn backup(b: &Belief, projections: &Projections, n_s: usize) -> Option<VEntry> {
    let mut best: Option<(f64, VEntry)> = None;
    for (a, per_observation) in projections.iter().enumerate() {
        let mut values = Array1::zeros(n_s);
        let mut observations = Vec::with_capacity(per_observation.len());
        for list in per_observation {
            let (id, _) = best_vector(b, list)?;
            values += &list[id].values;
            observations.push(list[id].observations[0]);
        }

        let entry = VEntry::new(values, a, observations);
        let value = entry.value_at(b);
        match best {
            Some((bv, _)) if bv >= value => {}
            _ => best = Some((value, entry)),
        }
    }

    best.map(|(_, e)| e)
}

fn check_belief_size(belief_size: usize) -> Result<usize> {
    if belief_size == 0 {
        return Err(Error::InvalidConfiguration {
            message: "belief_size must be at least 1".to_string(),
        });
    }

    Ok(belief_size)
}
