use super::pomdp::*;
use crate::common::{defs::*, utils::*};
use crate::error::Result;
use crate::mdps::{
    model::{check_probability_rows, check_shape},
    GenerativeMdp, Mdp,
};
use ndarray::{s, Array3};
use rand::prelude::*;
use std::sync::Mutex;

/// POMDP built on top of any MDP model.
///
/// The underlying model supplies transitions and rewards; this type adds
/// an observation table indexed `[s1, a, o]` and its own sampler.
#[derive(Debug)]
pub struct Model<M> {
    mdp: M,
    n_o: usize,
    observations: Table3D,
    rng: Mutex<StdRng>,
}

impl<M: Mdp> Model<M> {
    /// Every transition emits observation 0.
    pub fn new(n_o: usize, mdp: M, seed: u64) -> Self {
        let (n_s, n_a) = (mdp.n_s(), mdp.n_a());
        let mut observations = Array3::zeros((n_s, n_a, n_o));
        if n_o > 0 {
            observations.slice_mut(s![.., .., 0]).fill(1.);
        }

        Self {
            mdp,
            n_o,
            observations,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn with_observations(observations: Table3D, mdp: M, seed: u64) -> Result<Self> {
        let mut m = Self::new(observations.dim().2, mdp, seed);
        m.set_observation_function(observations)?;

        Ok(m)
    }

    /// Replaces the observation table. The old table is kept if the new one is invalid.
    pub fn set_observation_function(&mut self, observations: Table3D) -> Result<()> {
        check_shape(
            "observation table",
            &observations,
            [self.mdp.n_s(), self.mdp.n_a(), self.n_o],
        )?;
        check_probability_rows("observation table", &observations)?;
        self.observations = observations;

        Ok(())
    }

    pub fn observation_function(&self) -> &Table3D {
        &self.observations
    }

    pub fn mdp(&self) -> &M {
        &self.mdp
    }

    pub fn mdp_mut(&mut self) -> &mut M {
        &mut self.mdp
    }

    /// Samples an observation and reward consistent with a known transition.
    pub fn sample_or(&self, s: usize, a: usize, s1: usize) -> (usize, f64) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let o = sample_probability(self.observations.slice(s![s1, a, ..]), &mut *rng);

        (o, self.mdp.expected_reward(s, a, s1))
    }
}

impl Model<crate::mdps::Model> {
    /// Dense copy of any POMDP, with a fresh sampler seeded by `seed`.
    pub fn from_pomdp<P: Pomdp>(model: &P, seed: u64) -> Result<Self> {
        let (n_s, n_a, n_o) = (model.n_s(), model.n_a(), model.n_o());
        let transitions = Array3::from_shape_fn((n_s, n_a, n_s), |(s, a, s1)| {
            model.transition_probability(s, a, s1)
        });
        let rewards = Array3::from_shape_fn((n_s, n_a, n_s), |(s, a, s1)| {
            model.expected_reward(s, a, s1)
        });
        let observations = Array3::from_shape_fn((n_s, n_a, n_o), |(s1, a, o)| {
            model.observation_probability(s1, a, o)
        });

        let mdp = crate::mdps::Model::from_tables(transitions, rewards, model.discount(), seed)?;
        Self::with_observations(observations, mdp, seed)
    }
}

impl<M: Mdp> Mdp for Model<M> {
    fn n_s(&self) -> usize {
        self.mdp.n_s()
    }

    fn n_a(&self) -> usize {
        self.mdp.n_a()
    }

    fn discount(&self) -> f64 {
        self.mdp.discount()
    }

    fn transition_probability(&self, s: usize, a: usize, s1: usize) -> f64 {
        self.mdp.transition_probability(s, a, s1)
    }

    fn expected_reward(&self, s: usize, a: usize, s1: usize) -> f64 {
        self.mdp.expected_reward(s, a, s1)
    }
}

impl<M: Mdp> Pomdp for Model<M> {
    fn n_o(&self) -> usize {
        self.n_o
    }

    fn observation_probability(&self, s1: usize, a: usize, o: usize) -> f64 {
        self.observations[[s1, a, o]]
    }
}

impl<M: GenerativeMdp> GenerativeMdp for Model<M> {
    fn sample(&self, s: usize, a: usize) -> (usize, f64) {
        self.mdp.sample(s, a)
    }
}

impl<M: GenerativeMdp> GenerativePomdp for Model<M> {
    fn sample_sor(&self, s: usize, a: usize) -> (usize, usize, f64) {
        let (s1, r) = self.mdp.sample(s, a);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let o = sample_probability(self.observations.slice(s![s1, a, ..]), &mut *rng);

        (s1, o, r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mdps;

    #[test]
    fn construction_emits_observation_zero() {
        let m = Model::new(3, mdps::Model::new(2, 2, 0.9, 0).unwrap(), 0);

        assert_eq!(m.n_o(), 3);
        assert_eq!(m.n_s(), 2);
        assert_eq!(m.observation_probability(1, 1, 0), 1.);
        assert_eq!(m.observation_probability(1, 1, 2), 0.);

        for _ in 0..20 {
            assert_eq!(m.sample_sor(0, 1), (0, 0, 0.));
        }
    }

    #[test]
    fn invalid_observation_table_is_rejected() {
        let mut obs = Array3::zeros((2, 1, 2));
        obs[[0, 0, 0]] = 1.;
        obs[[1, 0, 1]] = 0.4;
        let mdp = mdps::Model::new(2, 1, 0.9, 0).unwrap();

        assert!(matches!(
            Model::with_observations(obs, mdp, 0),
            Err(Error::InvalidProbability { .. })
        ));

        let mut m = Model::new(2, mdps::Model::new(2, 1, 0.9, 0).unwrap(), 0);
        assert!(matches!(
            m.set_observation_function(Array3::zeros((2, 2, 2))),
            Err(Error::DimensionMismatch { .. })
        ));
        assert_eq!(m.observation_probability(0, 0, 0), 1.);
    }

    #[test]
    fn copy_of_another_pomdp_matches_it() {
        let original = crate::envs::tiger::tiger(0).unwrap();
        let copy = Model::from_pomdp(&original, 9).unwrap();

        assert_eq!((copy.n_s(), copy.n_a(), copy.n_o()), (2, 3, 2));
        assert_eq!(copy.discount(), original.discount());
        assert_eq!(copy.observation_function(), original.observation_function());
        for s in 0..2 {
            for a in 0..3 {
                for s1 in 0..2 {
                    assert_eq!(
                        copy.transition_probability(s, a, s1),
                        original.transition_probability(s, a, s1)
                    );
                    assert_eq!(
                        copy.expected_reward(s, a, s1),
                        original.expected_reward(s, a, s1)
                    );
                }
            }
        }
    }

    #[test]
    fn sampling_follows_observation_table() {
        let mut obs = Array3::zeros((2, 1, 2));
        obs[[0, 0, 1]] = 1.;
        obs[[1, 0, 0]] = 1.;
        let m = Model::with_observations(obs, mdps::Model::new(2, 1, 0.9, 3).unwrap(), 3)
            .unwrap();

        assert_eq!(m.sample_sor(0, 0), (0, 1, 0.));
        assert_eq!(m.sample_sor(1, 0), (1, 0, 0.));
        assert_eq!(m.sample_or(1, 0, 0), (1, 0.));
    }
}
