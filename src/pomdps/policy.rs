use super::{types::*, utils::best_vector};
use crate::common::defs::{self, Belief};

/// Greedy policy over a computed `ValueFunction`.
///
/// The last horizon is used by default. Once an entry has been picked, the
/// rest of its conditional plan can be followed through its observation
/// map without looking at beliefs again.
#[derive(Debug, Clone)]
pub struct Policy {
    value_function: ValueFunction,
}

impl Policy {
    pub fn new(value_function: ValueFunction) -> Self {
        Self { value_function }
    }

    pub fn horizon(&self) -> usize {
        self.value_function.len().saturating_sub(1)
    }

    pub fn value_function(&self) -> &ValueFunction {
        &self.value_function
    }

    /// Returns `(action, vector index, value)` of the best vector at `b`.
    pub fn best_action(&self, b: &Belief) -> Option<(usize, usize, f64)> {
        self.best_action_at(b, self.horizon())
    }

    pub fn best_action_at(&self, b: &Belief, horizon: usize) -> Option<(usize, usize, f64)> {
        let list = self.value_function.get(horizon)?;
        let (id, value) = best_vector(b, list)?;

        Some((list[id].action, id, value))
    }

    /// After acting with entry `id` at `horizon` and observing `o`, returns
    /// the `(action, index)` to use at `horizon - 1`.
    pub fn follow(&self, horizon: usize, id: usize, o: usize) -> Option<(usize, usize)> {
        if horizon < 2 {
            return None;
        }

        let entry = self.value_function.get(horizon)?.get(id)?;
        let next_id = *entry.observations.get(o)?;
        let next = self.value_function.get(horizon - 1)?.get(next_id)?;

        Some((next.action, next_id))
    }
}

impl defs::Policy<Belief, usize> for Policy {
    fn policy(&self, s: &Belief) -> usize {
        self.best_action(s).map(|(a, _, _)| a).unwrap_or_default()
    }
}
