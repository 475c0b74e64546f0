use crate::common::{defs::*, utils::lexicographic_cmp};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// For each observation, the index of the vector to follow in the previous horizon's `VList`.
pub type VObs = Vec<usize>;

/// One value vector together with the conditional plan that generates it.
///
/// Entries are ordered lexicographically on the values, then on the
/// action, then on the observation map. Floats are compared with their
/// IEEE total order so the relation is total, and `>` is the strict
/// converse of `<`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VEntry {
    pub values: Vector,
    pub action: usize,
    pub observations: VObs,
}

pub type VList = Vec<VEntry>;

/// One `VList` per horizon; index 0 holds the immediate-reward-free base case.
pub type ValueFunction = Vec<VList>;

impl VEntry {
    pub fn new(values: Vector, action: usize, observations: VObs) -> Self {
        Self {
            values,
            action,
            observations,
        }
    }

    /// Expected value of following this entry's plan from belief `b`.
    pub fn value_at(&self, b: &Belief) -> f64 {
        self.values.dot(b)
    }
}

impl PartialEq for VEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VEntry {}

impl PartialOrd for VEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        lexicographic_cmp(self.values.view(), other.values.view())
            .then_with(|| self.action.cmp(&other.action))
            .then_with(|| self.observations.cmp(&other.observations))
    }
}
