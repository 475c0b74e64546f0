use crate::error::Result;
use crate::mdps;
use crate::pomdps::Model;
use ndarray::Array3;

pub const TIGER_LEFT: usize = 0;
pub const TIGER_RIGHT: usize = 1;

pub const LISTEN: usize = 0;
pub const OPEN_LEFT: usize = 1;
pub const OPEN_RIGHT: usize = 2;

pub const HEAR_LEFT: usize = 0;
pub const HEAR_RIGHT: usize = 1;

pub type Tiger = Model<mdps::Model>;

/// The tiger problem (Kaelbling, Littman & Cassandra 1998).
///
/// A tiger hides behind one of two doors. Listening costs 1 and reports
/// the correct side 85% of the time; opening the tiger's door costs 100,
/// the other door pays 10. Opening any door resets the problem.
pub fn tiger(seed: u64) -> Result<Tiger> {
    let mut transitions = Array3::zeros((2, 3, 2));
    let mut rewards = Array3::zeros((2, 3, 2));
    let mut observations = Array3::zeros((2, 3, 2));

    for s in [TIGER_LEFT, TIGER_RIGHT] {
        transitions[[s, LISTEN, s]] = 1.;
        for a in [OPEN_LEFT, OPEN_RIGHT] {
            transitions[[s, a, TIGER_LEFT]] = 0.5;
            transitions[[s, a, TIGER_RIGHT]] = 0.5;
            for o in [HEAR_LEFT, HEAR_RIGHT] {
                observations[[s, a, o]] = 0.5;
            }
        }

        for s1 in [TIGER_LEFT, TIGER_RIGHT] {
            rewards[[s, LISTEN, s1]] = -1.;
        }
    }

    observations[[TIGER_LEFT, LISTEN, HEAR_LEFT]] = 0.85;
    observations[[TIGER_LEFT, LISTEN, HEAR_RIGHT]] = 0.15;
    observations[[TIGER_RIGHT, LISTEN, HEAR_RIGHT]] = 0.85;
    observations[[TIGER_RIGHT, LISTEN, HEAR_LEFT]] = 0.15;

    for s1 in [TIGER_LEFT, TIGER_RIGHT] {
        rewards[[TIGER_LEFT, OPEN_LEFT, s1]] = -100.;
        rewards[[TIGER_LEFT, OPEN_RIGHT, s1]] = 10.;
        rewards[[TIGER_RIGHT, OPEN_LEFT, s1]] = 10.;
        rewards[[TIGER_RIGHT, OPEN_RIGHT, s1]] = -100.;
    }

    let mdp = mdps::Model::from_tables(transitions, rewards, 0.95, seed)?;
    Model::with_observations(observations, mdp, seed.wrapping_add(1))
}
