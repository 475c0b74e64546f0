pub mod belief;
pub mod io;
pub mod model;
pub mod policy;
pub mod pomdp;
pub mod types;
pub mod utils;

pub use belief::*;
pub use model::Model;
pub use policy::Policy;
pub use pomdp::*;
pub use types::*;
pub use utils::*;
