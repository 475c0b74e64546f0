use super::{pomdp::*, utils::max_abs_difference};
use crate::common::{defs::*, utils::*};
use ndarray::Array1;
use rand::prelude::*;
use tracing::debug;

/// Bayes filter: the belief after taking `a` from `b` and observing `o`.
///
/// If `o` cannot be observed from `b` the result is all zeros; callers
/// should treat it as unreachable.
pub fn update_belief<M: Pomdp>(model: &M, b: &Belief, a: usize, o: usize) -> Belief {
    let n_s = model.n_s();
    let mut br = Array1::from_shape_fn(n_s, |s1| {
        let reach: f64 = (0..n_s)
            .map(|s| model.transition_probability(s, a, s1) * b[s])
            .sum();
        model.observation_probability(s1, a, o) * reach
    });

    let total = br.sum();
    if check_different_small(total, 0.) {
        br /= total;
    }

    br
}

/// Probability of observing `o` after taking `a` from belief `b`.
pub fn observation_probability_for_belief<M: Pomdp>(
    model: &M,
    b: &Belief,
    a: usize,
    o: usize,
) -> f64 {
    let n_s = model.n_s();
    (0..n_s)
        .map(|s1| {
            let reach: f64 = (0..n_s)
                .map(|s| model.transition_probability(s, a, s1) * b[s])
                .sum();
            model.observation_probability(s1, a, o) * reach
        })
        .sum()
}

/// Builds a set of distinct reachable beliefs for point-based methods.
///
/// The simplex vertices come first, then the uniform belief, then beliefs
/// reached by simulating single random steps from beliefs already found.
pub struct BeliefGenerator<'a, M> {
    model: &'a M,
    rng: StdRng,
    max_failures: usize,
}

impl<'a, M: GenerativePomdp> BeliefGenerator<'a, M> {
    pub fn new(model: &'a M, seed: u64) -> Self {
        Self {
            model,
            rng: StdRng::seed_from_u64(seed),
            max_failures: 1000,
        }
    }

    /// Consecutive simulated steps that may fail to find a new belief before giving up.
    pub fn with_max_failures(mut self, max_failures: usize) -> Self {
        self.max_failures = max_failures;
        self
    }

    pub fn generate(&mut self, n: usize) -> Vec<Belief> {
        let (n_s, n_a, n_o) = (self.model.n_s(), self.model.n_a(), self.model.n_o());
        let mut beliefs: Vec<Belief> = Vec::with_capacity(n);
        if n_s == 0 || n_a == 0 || n_o == 0 {
            return beliefs;
        }

        for s in 0..n_s.min(n) {
            let mut b = Array1::zeros(n_s);
            b[s] = 1.;
            beliefs.push(b);
        }
        let uniform = Array1::from_elem(n_s, 1. / n_s as f64);
        if beliefs.len() < n && is_new(&beliefs, &uniform) {
            beliefs.push(uniform);
        }

        let mut failures = 0;
        while beliefs.len() < n && failures < self.max_failures {
            let b = &beliefs[self.rng.gen_range(0..beliefs.len())];
            let s = sample_probability(b.view(), &mut self.rng);
            let a = self.rng.gen_range(0..n_a);
            let (_, o, _) = self.model.sample_sor(s, a);

            let nb = update_belief(self.model, b, a, o);
            if check_equal_small(nb.sum(), 0.) || !is_new(&beliefs, &nb) {
                failures += 1;
                continue;
            }

            beliefs.push(nb);
            failures = 0;
        }

        debug!(
            event = "beliefs_generated",
            requested = n,
            generated = beliefs.len()
        );
        beliefs
    }
}

fn is_new(beliefs: &[Belief], b: &Belief) -> bool {
    beliefs.iter().all(|x| max_abs_difference(x, b) > 1e-9)
}
