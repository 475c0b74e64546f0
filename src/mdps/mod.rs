pub mod experience;
pub mod io;
pub mod mdp;
pub mod model;
pub mod policies;
pub mod rl_model;

pub use experience::Experience;
pub use mdp::*;
pub use model::Model;
pub use policies::{EpsilonPolicy, QGreedyPolicy};
pub use rl_model::RlModel;
