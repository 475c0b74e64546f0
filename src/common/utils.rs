use ndarray::ArrayView1;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::cmp::Ordering;

/// Two numbers near [0,1] are equal when they are within a few ulps.
pub fn check_equal_small(a: f64, b: f64) -> bool {
    (a - b).abs() <= 5. * f64::EPSILON
}

pub fn check_different_small(a: f64, b: f64) -> bool {
    !check_equal_small(a, b)
}

/// Relative comparison, usable away from [0,1].
pub fn check_equal_general(a: f64, b: f64) -> bool {
    if check_equal_small(a, b) {
        return true;
    }

    (a - b).abs() / a.abs().min(b.abs()) < f64::EPSILON
}

pub fn check_different_general(a: f64, b: f64) -> bool {
    !check_equal_general(a, b)
}

pub fn is_probability(row: ArrayView1<f64>) -> bool {
    if row.iter().any(|&p| p < 0. || !p.is_finite()) {
        return false;
    }

    (row.sum() - 1.).abs() <= 1e-9
}

/// Draws an index from `row`, read as a discrete distribution.
///
/// A row that cannot be sampled (all zeros) yields its last index.
pub fn sample_probability<R>(row: ArrayView1<f64>, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    match WeightedIndex::new(row.iter().map(|p| p.max(0.))) {
        Ok(dist) => dist.sample(rng),
        Err(_) => row.len().saturating_sub(1),
    }
}

/// Lexicographic order over vectors, using the IEEE total order per element.
pub fn lexicographic_cmp(lhs: ArrayView1<f64>, rhs: ArrayView1<f64>) -> Ordering {
    for (l, r) in lhs.iter().zip(rhs.iter()) {
        match l.total_cmp(r) {
            Ordering::Equal => continue,
            o => return o,
        }
    }

    lhs.len().cmp(&rhs.len())
}
