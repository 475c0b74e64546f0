pub mod common;
pub mod incremental_pruning;
mod lp;
pub mod pbvi;
pub mod prune;

pub use common::{cross_sum, project, project_all, Projections};
pub use incremental_pruning::IncrementalPruning;
pub use pbvi::Pbvi;
pub use prune::{PairwisePrune, Prune, Pruner, WitnessPrune};
