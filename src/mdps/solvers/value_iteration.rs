use super::common::*;
use super::MdpSolver;
use crate::common::defs::*;
use crate::mdps::mdp::Mdp;
use tracing::{debug, info};

/// Synchronous value iteration: every sweep reads only the previous sweep's
/// table. Runs a fixed number of sweeps, there is no convergence test.
#[derive(Debug, Clone)]
pub struct ValueIteration<'a, M: Mdp> {
    mdp: &'a M,
    gamma: Continous,
    v: ValueTable,
    pi: Policy,
}

impl<'a, M: Mdp> ValueIteration<'a, M> {
    pub fn new(mdp: &'a M, gamma: Continous) -> Self {
        Self {
            mdp,
            gamma,
            v: ValueTable::new(mdp.states()),
            pi: Policy::new(),
        }
    }

    /// Runs `num_sweeps` further sweeps over the current table.
    pub fn exec(&mut self, num_sweeps: usize) {
        for sweep in 0..num_sweeps {
            let old_v = self.v.clone();
            for &s in self.mdp.states() {
                if self.mdp.is_terminal(s) {
                    continue;
                }

                if let Some((a, q)) = greedy_action(self.mdp, &old_v, s, self.gamma) {
                    self.v.set(s, q);
                    self.pi.insert(s, a);
                }
            }

            debug!(sweep, delta = max_abs_diff(&old_v, &self.v), "value iteration sweep");
        }

        info!(num_sweeps, n_s = self.mdp.n_s(), "value iteration done");
    }

    pub fn value(&self) -> &ValueTable {
        &self.v
    }

    pub fn policy(&self) -> &Policy {
        &self.pi
    }

    pub fn into_parts(self) -> (ValueTable, Policy) {
        (self.v, self.pi)
    }
}

impl<M: Mdp> MdpSolver for ValueIteration<'_, M> {
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

/// `k` sweeps of value iteration from an all-zero table.
pub fn value_iteration<M: Mdp>(mdp: &M, k: usize, gamma: Continous) -> (ValueTable, Policy) {
    let mut vi = ValueIteration::new(mdp, gamma);
    vi.exec(k);
    vi.into_parts()
}

pub(crate) fn max_abs_diff(a: &ValueTable, b: &ValueTable) -> Continous {
    a.iter()
        .map(|(s, x)| (x - b[s]).abs())
        .fold(0., Continous::max)
}
