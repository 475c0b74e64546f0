pub mod mdp;
pub mod pomdp;
