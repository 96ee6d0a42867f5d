use crate::common::defs::*;
use crate::mdps::mdp::Mdp;

/// One-step lookahead `r + gamma * V(s')`, where `s'` is `s` itself when the
/// move would leave the state space.
pub fn q_value<M: Mdp + ?Sized>(
    mdp: &M,
    v: &ValueTable,
    s: State,
    a: Action,
    gamma: Continous,
) -> Continous {
    let (next, _) = mdp.attempt_move(s, a);
    mdp.step_reward() + gamma * v[next]
}

/// Best action and its value. Ties go to the action enumerated first.
pub fn greedy_action<M: Mdp + ?Sized>(
    mdp: &M,
    v: &ValueTable,
    s: State,
    gamma: Continous,
) -> Option<(Action, Continous)> {
    mdp.actions()
        .iter()
        .map(|&a| (a, q_value(mdp, v, s, a, gamma)))
        .fold(None, |best, (a, q)| match best {
            Some((_, best_q)) if best_q >= q => best,
            _ => Some((a, q)),
        })
}

/// Rounds to `decimals` places by the exact decimal value of `x`, so that
/// `-0.95` (stored as `-0.9499...`) rounds to `-0.9`.
pub fn round_to(x: Continous, decimals: usize) -> Continous {
    format!("{x:.decimals$}").parse().unwrap_or(x)
}
