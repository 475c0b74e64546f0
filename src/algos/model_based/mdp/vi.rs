use crate::algos::check_epsilon;
use crate::common::defs::*;
use crate::error::Result;
use crate::mdps::{Mdp, QGreedyPolicy};
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, info};

/// State values of an MDP together with the greedy action in each state.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFunction {
    pub values: Vector,
    pub actions: Vec<usize>,
}

/// Value Iteration - Sutton & Barto 2018, section 4.4.
#[derive(Debug, Clone)]
pub struct ValueIteration {
    horizon: usize,
    epsilon: f64,
}

impl ValueIteration {
    /// An `epsilon` of 0 always runs the full horizon.
    pub fn new(horizon: usize, epsilon: f64) -> Result<Self> {
        Ok(Self {
            horizon,
            epsilon: check_epsilon(epsilon)?,
        })
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

    pub fn solve<M: Mdp>(&self, model: &M) -> (bool, ValueFunction, QFunction) {
        let (n_s, n_a) = (model.n_s(), model.n_a());
        info!(
            event = "solve_start",
            solver = "value_iteration",
            horizon = self.horizon,
            epsilon = self.epsilon,
            states = n_s,
            actions = n_a,
        );

        let immediate = model.immediate_rewards();
        let mut v: Vector = Array1::zeros(n_s);
        let mut q: QFunction = immediate.clone();
        let mut converged = false;
        for t in 1..=self.horizon {
            q = bellman_backup(model, &immediate, &v);
            let v1 = q.map_axis(Axis(1), |row| row.fold(f64::NEG_INFINITY, |m, &x| m.max(x)));
            let variation = (&v1 - &v)
                .iter()
                .fold(0., |m: f64, x| m.max(x.abs()));
            v = v1;

            debug!(event = "iteration_end", iteration = t, variation);
            if self.epsilon > 0. && variation < self.epsilon {
                converged = true;
                break;
            }
        }

        let greedy = QGreedyPolicy::new(&q);
        let actions = (0..n_s).map(|s| greedy.greedy_action(s)).collect();
        info!(event = "solve_end", solver = "value_iteration", converged);
        (converged, ValueFunction { values: v, actions }, q)
    }
}

/// `Q(s,a) = R(s,a) + gamma * sum_s1 T(s,a,s1) v(s1)`.
fn bellman_backup<M: Mdp>(model: &M, immediate: &Matrix2D, v: &Vector) -> QFunction {
    let (n_s, n_a) = (model.n_s(), model.n_a());
    let discount = model.discount();

    Array2::from_shape_fn((n_s, n_a), |(s, a)| {
        let future: f64 = (0..n_s)
            .map(|s1| model.transition_probability(s, a, s1) * v[s1])
            .sum();
        immediate[[s, a]] + discount * future
    })
}
