use crate::mdps::Mdp;

/// An MDP whose state is only revealed through observations.
pub trait Pomdp: Mdp {
    fn n_o(&self) -> usize;

    /// Probability of observing `o` after taking `a` and landing in `s1`.
    fn observation_probability(&self, s1: usize, a: usize, o: usize) -> f64;
}

pub trait GenerativePomdp: Pomdp {
    /// Samples a successor state, the observation it emits and the reward.
    fn sample_sor(&self, s: usize, a: usize) -> (usize, usize, f64);
}
