pub mod common;
pub mod mc_methods;
pub mod policy_iteration;
pub mod td_methods;
pub mod value_iteration;

use crate::common::defs::*;

/// Planner over a fully known [`super::mdp::Mdp`].
pub trait MdpSolver {
    fn v_star(&self, s: State) -> Continous;

    /// `None` for terminal states, where no action is taken.
    fn q_star(&self, s: State, a: Action) -> Option<Continous>;

    fn pi_star(&self, s: State) -> Option<Action>;
}
