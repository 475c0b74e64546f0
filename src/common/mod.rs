pub mod defs;
pub mod utils;

pub use defs::*;
pub use utils::*;
