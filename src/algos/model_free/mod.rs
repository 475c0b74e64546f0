pub mod on_policy;

pub use on_policy::sarsa::Sarsa;
