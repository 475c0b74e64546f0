pub mod vi;

pub use vi::{ValueFunction, ValueIteration};
