//! Removal of value vectors that are not needed to represent the upper
//! envelope of a `VList` over the belief simplex.

use super::lp::{self, LpStatus};
use crate::common::{defs::*, utils::lexicographic_cmp};
use crate::pomdps::types::*;
use ndarray::{Array1, Array2};
use std::cmp::Ordering;

/// Componentwise tolerance under which two values are considered equal.
const DOMINANCE_TOLERANCE: f64 = 5. * f64::EPSILON;

/// Reduces a set of vectors to a subset with the same upper envelope.
///
/// Implementations must be deterministic: the same input gives the same
/// output, sorted by the `VEntry` order.
pub trait Prune {
    fn prune(&self, list: VList) -> VList;
}

/// Pointwise dominance only. Cheap but leaves in vectors that are beaten
/// everywhere by a combination of others.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PairwisePrune;

impl Prune for PairwisePrune {
    fn prune(&self, list: VList) -> VList {
        prune_dominated(list)
    }
}

/// Exact pruning with linear programs, after Lark and White.
///
/// Survivors of a pointwise pass are only kept when a belief exists where
/// they beat every already accepted vector by more than `tolerance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WitnessPrune {
    tolerance: f64,
}

impl WitnessPrune {
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Looks for a belief where `v` beats every vector in `accepted`.
    fn find_witness(&self, v: &Vector, accepted: &[VEntry]) -> Option<Belief> {
        let n_s = v.len();

        // Variables are b_0..b_{n_s-1} followed by d.
        let mut a = Array2::zeros((accepted.len() + 1, n_s + 1));
        for (i, u) in accepted.iter().enumerate() {
            for s in 0..n_s {
                a[[i, s]] = u.values[s] - v[s];
            }
            a[[i, n_s]] = 1.;
        }
        for s in 0..n_s {
            a[[accepted.len(), s]] = 1.;
        }
        let mut b = vec![0.; accepted.len() + 1];
        b[accepted.len()] = 1.;
        let mut c = vec![0.; n_s + 1];
        c[n_s] = 1.;

        let sol = lp::maximize(&c, &a, &b);
        match sol.status {
            LpStatus::Optimal if sol.value <= self.tolerance => None,
            // A witness, or an inconclusive program which counts as one.
            _ => Some(normalize_or_uniform(Array1::from(sol.x[..n_s].to_vec()))),
        }
    }

    /// Index of the best candidate at `b`, lexicographically largest among
    /// those within `tolerance` of the maximum value.
    fn lexmax_best(&self, b: &Belief, candidates: &[VEntry]) -> usize {
        let mut best = 0;
        // Highest value seen so far, which may belong to a replaced candidate.
        let mut max_value = candidates[0].value_at(b);
        for (i, c) in candidates.iter().enumerate().skip(1) {
            let value = c.value_at(b);
            if value > max_value + self.tolerance {
                best = i;
                max_value = value;
            } else if value >= max_value - self.tolerance
                && lexicographic_cmp(c.values.view(), candidates[best].values.view())
                    == Ordering::Greater
            {
                best = i;
                max_value = max_value.max(value);
            }
        }

        best
    }
}

impl Default for WitnessPrune {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE)
    }
}

impl Prune for WitnessPrune {
    fn prune(&self, list: VList) -> VList {
        let mut candidates = prune_dominated(list);
        if candidates.len() <= 1 {
            return candidates;
        }
        let n_s = candidates[0].values.len();

        // Winners at the simplex corners are always part of the envelope.
        let mut corners: Vec<usize> = (0..n_s)
            .map(|s| {
                let mut e = Array1::zeros(n_s);
                e[s] = 1.;
                self.lexmax_best(&e, &candidates)
            })
            .collect();
        corners.sort_unstable();
        corners.dedup();
        let mut accepted: VList = Vec::with_capacity(candidates.len());
        for &i in corners.iter().rev() {
            accepted.push(candidates.swap_remove(i));
        }

        while let Some(v) = candidates.last() {
            let witness = if accepted.is_empty() {
                Some(Array1::from_elem(n_s, 1. / n_s as f64))
            } else {
                self.find_witness(&v.values, &accepted)
            };

            match witness {
                None => {
                    candidates.pop();
                }
                Some(b) => {
                    let i = self.lexmax_best(&b, &candidates);
                    accepted.push(candidates.swap_remove(i));
                }
            }
        }

        accepted.sort();
        accepted
    }
}

/// Pruning strategy chosen at runtime, e.g. from a `SolverConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pruner {
    Pairwise(PairwisePrune),
    Witness(WitnessPrune),
}

impl Prune for Pruner {
    fn prune(&self, list: VList) -> VList {
        match self {
            Pruner::Pairwise(p) => p.prune(list),
            Pruner::Witness(p) => p.prune(list),
        }
    }
}

impl Default for Pruner {
    fn default() -> Self {
        Pruner::Witness(WitnessPrune::default())
    }
}

/// Sorts `list` and removes every vector that another one dominates
/// componentwise. Among equal vectors the lowest in `VEntry` order stays.
pub(crate) fn prune_dominated(mut list: VList) -> VList {
    list.sort();

    let n = list.len();
    let mut keep = vec![true; n];
    for i in 0..n {
        for j in 0..n {
            if i == j || !keep[j] {
                continue;
            }
            let dominated = match dominance(&list[j].values, &list[i].values) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => j < i,
                _ => false,
            };
            if dominated {
                keep[i] = false;
                break;
            }
        }
    }

    list.into_iter()
        .zip(keep)
        .filter_map(|(v, k)| k.then_some(v))
        .collect()
}

/// `Greater` if `lhs` weakly dominates `rhs` and is better somewhere,
/// `Equal` if they match within tolerance, `None` otherwise.
fn dominance(lhs: &Vector, rhs: &Vector) -> Option<Ordering> {
    let mut better = false;
    for (l, r) in lhs.iter().zip(rhs.iter()) {
        if *l < r - DOMINANCE_TOLERANCE {
            return None;
        }
        if *l > r + DOMINANCE_TOLERANCE {
            better = true;
        }
    }

    Some(if better {
        Ordering::Greater
    } else {
        Ordering::Equal
    })
}

fn normalize_or_uniform(mut b: Belief) -> Belief {
    b.mapv_inplace(|x| x.max(0.));
    let total = b.sum();
    if total > 0. {
        b / total
    } else {
        let n_s = b.len();
        Array1::from_elem(n_s, 1. / n_s as f64)
    }
}
