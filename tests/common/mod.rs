#![allow(dead_code)]

use ndarray::{Array1, Array3};
use pomdp_solver::mdps::Mdp;
use pomdp_solver::pomdps::{self, VEntry, VList};
use proptest::prelude::*;

/// Values on a coarse grid, so that ties and exact duplicates show up.
pub fn value() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => (-20i32..=20).prop_map(|x| x as f64 * 0.25),
        1 => -5.0..5.0f64,
    ]
}

pub fn ventry(n_s: usize, n_o: usize) -> impl Strategy<Value = VEntry> {
    (
        prop::collection::vec(value(), n_s),
        0usize..3,
        prop::collection::vec(0usize..4, n_o),
    )
        .prop_map(|(values, action, observations)| {
            VEntry::new(Array1::from(values), action, observations)
        })
}

pub fn vlist(n_s: usize, n_o: usize, len: std::ops::Range<usize>) -> impl Strategy<Value = VList> {
    prop::collection::vec(ventry(n_s, n_o), len)
}

/// Every belief whose entries are multiples of `1 / steps`.
pub fn belief_grid(n_s: usize, steps: usize) -> Vec<Array1<f64>> {
    fn fill(n_s: usize, left: usize, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if prefix.len() + 1 == n_s {
            prefix.push(left);
            out.push(prefix.clone());
            prefix.pop();
            return;
        }
        for k in 0..=left {
            prefix.push(k);
            fill(n_s, left - k, prefix, out);
            prefix.pop();
        }
    }

    let mut points = vec![];
    fill(n_s, steps, &mut vec![], &mut points);
    points
        .into_iter()
        .map(|p| p.into_iter().map(|k| k as f64 / steps as f64).collect())
        .collect()
}

pub fn vertices(n_s: usize) -> Vec<Array1<f64>> {
    (0..n_s)
        .map(|s| {
            let mut b = Array1::zeros(n_s);
            b[s] = 1.;
            b
        })
        .collect()
}

pub fn envelope(list: &[VEntry], b: &Array1<f64>) -> f64 {
    list.iter()
        .map(|v| v.value_at(b))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Wraps `mdp` so that every observation reveals the state reached.
pub fn fully_observable<M: Mdp>(mdp: M) -> pomdps::Model<M> {
    let (n_s, n_a) = (mdp.n_s(), mdp.n_a());
    let mut observations = Array3::zeros((n_s, n_a, n_s));
    for s1 in 0..n_s {
        for a in 0..n_a {
            observations[[s1, a, s1]] = 1.;
        }
    }

    pomdps::Model::with_observations(observations, mdp, 0).unwrap()
}
