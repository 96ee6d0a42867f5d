pub mod common;
pub mod config;
pub mod envs;
pub mod error;
pub mod mdps;

pub use common::defs::*;
pub use envs::grid_world::GridWorld;
pub use mdps::mdp::Mdp;
