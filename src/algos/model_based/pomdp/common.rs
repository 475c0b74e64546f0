use crate::common::defs::*;
use crate::pomdps::{pomdp::Pomdp, types::*};
use ndarray::{Array2, Zip};

/// Projections of a whole `VList`, indexed `[a][o]`.
pub type Projections = Vec<Vec<VList>>;

/// Projects every vector of `prev` through action `a` and observation `o`.
///
/// Entry `i` of the result is
/// `R(s,a)/|O| + gamma * sum_s1 T(s,a,s1) Z(s1,a,o) prev[i](s1)`, with
/// observation map `[i]`. Summing one projection per observation gives a
/// full one-step backup.
pub fn project<M: Pomdp>(
    model: &M,
    immediate: &Matrix2D,
    prev: &[VEntry],
    a: usize,
    o: usize,
) -> VList {
    let n_s = model.n_s();
    let discount = model.discount();
    let reward_share = 1. / model.n_o() as f64;

    let step = Array2::from_shape_fn((n_s, n_s), |(s, s1)| {
        model.transition_probability(s, a, s1) * model.observation_probability(s1, a, o)
    });
    let reward = immediate.column(a);

    prev.iter()
        .enumerate()
        .map(|(i, v)| {
            let mut values = step.dot(&v.values);
            Zip::from(&mut values)
                .and(&reward)
                .for_each(|x, &r| *x = r * reward_share + discount * *x);
            VEntry::new(values, a, vec![i])
        })
        .collect()
}

/// Every `(a, o)` projection of `prev`.
pub fn project_all<M: Pomdp>(model: &M, immediate: &Matrix2D, prev: &[VEntry]) -> Projections {
    (0..model.n_a())
        .map(|a| {
            (0..model.n_o())
                .map(|o| project(model, immediate, prev, a, o))
                .collect()
        })
        .collect()
}

/// Pairwise sums of the entries of `l1` and `l2`, all tagged with action `a`.
///
/// The observation maps are concatenated, `l1` first when `order` is true
/// and `l2` first otherwise. Output follows `l1`-major order; an empty input
/// gives an empty result.
pub fn cross_sum(l1: &[VEntry], l2: &[VEntry], a: usize, order: bool) -> VList {
    let mut out = Vec::with_capacity(l1.len() * l2.len());
    for x in l1 {
        for y in l2 {
            let (first, second) = if order { (x, y) } else { (y, x) };
            let mut observations =
                Vec::with_capacity(first.observations.len() + second.observations.len());
            observations.extend_from_slice(&first.observations);
            observations.extend_from_slice(&second.observations);

            out.push(VEntry::new(&x.values + &y.values, a, observations));
        }
    }

    out
}
