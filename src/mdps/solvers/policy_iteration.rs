use super::common::*;
use super::MdpSolver;
use crate::common::defs::*;
use crate::mdps::mdp::Mdp;
use crate::mdps::mdp_simulator::random_policy;
use rand::prelude::*;
use tracing::{debug, info, trace};

/// Policy iteration - Sutton & Barto 2018, 4.3.
///
/// Each round evaluates the current policy with a fixed number of synchronous
/// sweeps from an all-zero table, then improves it greedily.
#[derive(Debug, Clone)]
pub struct PolicyIteration<'a, M: Mdp> {
    mdp: &'a M,
    gamma: Continous,
    evaluation_sweeps: usize,
    v: ValueTable,
    pi: Policy,
}

impl<'a, M: Mdp> PolicyIteration<'a, M> {
    /// Starts from one uniformly random action per non-terminal state.
    pub fn new(mdp: &'a M, gamma: Continous, evaluation_sweeps: usize, rng: &mut StdRng) -> Self {
        let pi = random_policy(mdp, rng);
        Self::with_policy(mdp, gamma, evaluation_sweeps, pi)
    }

    pub fn with_policy(mdp: &'a M, gamma: Continous, evaluation_sweeps: usize, pi: Policy) -> Self {
        Self {
            mdp,
            gamma,
            evaluation_sweeps,
            v: ValueTable::new(mdp.states()),
            pi,
        }
    }

    /// Runs exactly `num_rounds` evaluation/improvement rounds. Returns whether
    /// the last round left the policy unchanged.
    pub fn exec(&mut self, num_rounds: usize) -> bool {
        let mut stable = false;
        for round in 0..num_rounds {
            self.v = policy_evaluation(self.mdp, &self.pi, self.evaluation_sweeps, self.gamma);
            let pi = policy_improvement(self.mdp, &self.v, self.gamma);
            stable = pi == self.pi;
            self.pi = pi;

            debug!(round, stable, "policy iteration round");
        }

        info!(num_rounds, stable, "policy iteration done");
        stable
    }

    /// Values of the policy that was evaluated last.
    pub fn value(&self) -> &ValueTable {
        &self.v
    }

    pub fn policy(&self) -> &Policy {
        &self.pi
    }

    pub fn into_policy(self) -> Policy {
        self.pi
    }
}

impl<M: Mdp> MdpSolver for PolicyIteration<'_, M> {
    fn v_star(&self, s: State) -> Continous {
        self.v[s]
    }

    fn q_star(&self, s: State, a: Action) -> Option<Continous> {
        if self.mdp.is_terminal(s) {
            None
        } else {
            Some(q_value(self.mdp, &self.v, s, a, self.gamma))
        }
    }

    fn pi_star(&self, s: State) -> Option<Action> {
        self.pi.get(s)
    }
}

/// `k` synchronous sweeps of `V(s) = r + gamma * V(s')` following `pi`.
/// A non-terminal state without a policy entry keeps its value.
pub fn policy_evaluation<M: Mdp + ?Sized>(
    mdp: &M,
    pi: &Policy,
    k: usize,
    gamma: Continous,
) -> ValueTable {
    let mut v = ValueTable::new(mdp.states());
    for _ in 0..k {
        let old_v = v.clone();
        for &s in mdp.states() {
            if mdp.is_terminal(s) {
                continue;
            }

            match pi.get(s) {
                Some(a) => v.set(s, q_value(mdp, &old_v, s, a, gamma)),
                None => trace!(%s, "no action to evaluate"),
            }
        }
    }

    v
}

/// Greedy policy with respect to `v`, one entry per non-terminal state.
pub fn policy_improvement<M: Mdp + ?Sized>(mdp: &M, v: &ValueTable, gamma: Continous) -> Policy {
    mdp.non_terminal_states()
        .into_iter()
        .filter_map(|s| greedy_action(mdp, v, s, gamma).map(|(a, _)| (s, a)))
        .collect()
}

/// `k` rounds of policy iteration from a random initial policy.
pub fn policy_iteration<M: Mdp>(
    mdp: &M,
    k: usize,
    evaluation_sweeps: usize,
    gamma: Continous,
    rng: &mut StdRng,
) -> Policy {
    let mut pi = PolicyIteration::new(mdp, gamma, evaluation_sweeps, rng);
    pi.exec(k);
    pi.into_policy()
}
