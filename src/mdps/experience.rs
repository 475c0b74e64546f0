use ndarray::{Array2, Array3};

/// Visit counts and accumulated rewards collected from interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    n_s: usize,
    n_a: usize,
    pub(crate) visits: Array3<u64>,
    visits_sum: Array2<u64>,
    pub(crate) rewards: Array3<f64>,
    rewards_sum: Array2<f64>,
}

impl Experience {
    pub fn new(n_s: usize, n_a: usize) -> Self {
        Self {
            n_s,
            n_a,
            visits: Array3::zeros((n_s, n_a, n_s)),
            visits_sum: Array2::zeros((n_s, n_a)),
            rewards: Array3::zeros((n_s, n_a, n_s)),
            rewards_sum: Array2::zeros((n_s, n_a)),
        }
    }

    pub fn record(&mut self, s: usize, a: usize, s1: usize, r: f64) {
        self.visits[[s, a, s1]] += 1;
        self.visits_sum[[s, a]] += 1;

        self.rewards[[s, a, s1]] += r;
        self.rewards_sum[[s, a]] += r;
    }

    pub fn reset(&mut self) {
        self.visits.fill(0);
        self.visits_sum.fill(0);
        self.rewards.fill(0.);
        self.rewards_sum.fill(0.);
    }

    pub fn n_s(&self) -> usize {
        self.n_s
    }

    pub fn n_a(&self) -> usize {
        self.n_a
    }

    pub fn visits(&self, s: usize, a: usize, s1: usize) -> u64 {
        self.visits[[s, a, s1]]
    }

    pub fn visits_sum(&self, s: usize, a: usize) -> u64 {
        self.visits_sum[[s, a]]
    }

    pub fn reward(&self, s: usize, a: usize, s1: usize) -> f64 {
        self.rewards[[s, a, s1]]
    }

    pub fn reward_sum(&self, s: usize, a: usize) -> f64 {
        self.rewards_sum[[s, a]]
    }

    pub fn visit_table(&self) -> &Array3<u64> {
        &self.visits
    }

    pub fn reward_table(&self) -> &Array3<f64> {
        &self.rewards
    }

    /// Recomputes the per-pair totals after the raw tables were replaced.
    pub(crate) fn rebuild_sums(&mut self) {
        for s in 0..self.n_s {
            for a in 0..self.n_a {
                let mut visits = 0;
                let mut rewards = 0.;
                for s1 in 0..self.n_s {
                    visits += self.visits[[s, a, s1]];
                    rewards += self.rewards[[s, a, s1]];
                }
                self.visits_sum[[s, a]] = visits;
                self.rewards_sum[[s, a]] = rewards;
            }
        }
    }
}
