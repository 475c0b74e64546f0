use ndarray::{Array1, Array2, Array3};

pub type Vector = Array1<f64>;

/// Probability distribution over states.
pub type Belief = Array1<f64>;

pub type Matrix2D = Array2<f64>;

/// Dense table, indexed `[s, a, s1]` for transitions/rewards and
/// `[s1, a, o]` for observations.
pub type Table3D = Array3<f64>;

pub type QFunction = Array2<f64>;

pub trait Policy<S, A> {
    fn policy(&self, s: &S) -> A;
}
