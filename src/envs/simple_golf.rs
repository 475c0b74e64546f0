use crate::error::Result;
use crate::mdps::Model;
use itertools::iproduct;
use ndarray::Array3;

pub const START: usize = 0;
pub const FAIRWAY: usize = 1;
pub const HOLE: usize = 2;

pub const HIT_TO_FAIRWAY: usize = 0;
pub const HIT_TO_START: usize = 1;
pub const HIT_IN_HOLE: usize = 2;

/// https://towardsdatascience.com/reinforcement-learning-an-easy-introduction-to-value-iteration-e4cfe0731fd5
///
/// Actions that make no sense in a state leave the ball where it is, and
/// the hole is absorbing.
pub fn simple_golf(discount: f64, seed: u64) -> Result<Model> {
    let mut transitions = Array3::zeros((3, 3, 3));
    let mut rewards = Array3::zeros((3, 3, 3));
    for (s, a) in iproduct!(0..3, 0..3) {
        transitions[[s, a, s]] = 1.;
    }

    transitions[[START, HIT_TO_FAIRWAY, FAIRWAY]] = 0.9;
    transitions[[START, HIT_TO_FAIRWAY, START]] = 0.1;

    transitions[[FAIRWAY, HIT_TO_START, START]] = 0.9;
    transitions[[FAIRWAY, HIT_TO_START, FAIRWAY]] = 0.1;

    transitions[[FAIRWAY, HIT_IN_HOLE, HOLE]] = 0.9;
    transitions[[FAIRWAY, HIT_IN_HOLE, FAIRWAY]] = 0.1;
    rewards[[FAIRWAY, HIT_IN_HOLE, HOLE]] = 10.;

    Model::from_tables(transitions, rewards, discount, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdps::Mdp;

    #[test]
    fn hole_is_terminal() {
        let m = simple_golf(0.9, 0).unwrap();

        assert!(m.is_terminal(HOLE));
        assert!(!m.is_terminal(FAIRWAY));
        assert_eq!(m.expected_reward(FAIRWAY, HIT_IN_HOLE, HOLE), 10.);
        assert_eq!(m.transition_probability(START, HIT_IN_HOLE, START), 1.);
    }
}
