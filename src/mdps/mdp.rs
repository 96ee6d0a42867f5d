use crate::common::defs::*;

/// Deterministic, tabular Markov Decision Process - Sutton & Barto 2018.
///
/// Every step costs [`Mdp::step_reward`]. A move that leaves the state space
/// keeps the agent where it is and is still charged.
pub trait Mdp {
    fn states(&self) -> &[State];

    fn actions(&self) -> &[Action];

    fn is_terminal(&self, s: State) -> bool;

    /// Successor of `s` under `a` and whether the move was valid. On an
    /// invalid move the successor is `s` itself.
    fn attempt_move(&self, s: State, a: Action) -> (State, bool);

    fn step_reward(&self) -> Continous {
        -1.
    }

    fn n_s(&self) -> usize {
        self.states().len()
    }

    fn n_a(&self) -> usize {
        self.actions().len()
    }

    fn non_terminal_states(&self) -> Vec<State> {
        self.states()
            .iter()
            .copied()
            .filter(|&s| !self.is_terminal(s))
            .collect()
    }
}
