use super::types::*;
use crate::common::defs::*;
use ndarray::Array1;

/// An all-zero vector for action `a`, whose observation map points everywhere to index 0.
pub fn make_ventry(n_s: usize, a: usize, n_o: usize) -> VEntry {
    VEntry::new(Array1::zeros(n_s), a, vec![0; n_o])
}

/// The horizon-0 `VList`: nothing left to collect.
pub fn make_vlist(n_s: usize, n_o: usize) -> VList {
    vec![make_ventry(n_s, 0, n_o)]
}

pub fn make_value_function(n_s: usize, n_o: usize) -> ValueFunction {
    vec![make_vlist(n_s, n_o)]
}

/// Returns the index and value of the best vector at `b`, lowest index on ties.
pub fn best_vector(b: &Belief, list: &[VEntry]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in list.iter().enumerate() {
        let value = v.value_at(b);
        match best {
            Some((_, bv)) if bv >= value => {}
            _ => best = Some((i, value)),
        }
    }

    best
}

/// Largest elementwise difference between two vectors.
pub fn max_abs_difference(lhs: &Vector, rhs: &Vector) -> f64 {
    lhs.iter()
        .zip(rhs.iter())
        .map(|(l, r)| (l - r).abs())
        .fold(0., f64::max)
}

/// Weak bound on the change between two consecutive horizons.
///
/// Every new vector is matched with its closest old vector (max-norm) and
/// the farthest of these matches is returned. This is cheaper than the
/// exact bound, which needs one LP per vector, but it is only a proxy: it
/// does not bound the loss of the resulting policy.
///
/// An empty `old` list yields 0 by convention. That means "no prior
/// information", not convergence.
pub fn weak_bound_distance(old: &[VEntry], new: &[VEntry]) -> f64 {
    if old.is_empty() {
        return 0.;
    }

    new.iter()
        .map(|n| {
            old.iter()
                .map(|o| max_abs_difference(&n.values, &o.values))
                .fold(f64::INFINITY, f64::min)
        })
        .fold(0., f64::max)
}
