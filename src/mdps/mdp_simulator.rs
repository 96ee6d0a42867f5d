use crate::common::defs::*;
use crate::mdps::mdp::Mdp;
use rand::prelude::*;
use tracing::{debug, trace};

/// Hard cap on the length of a sampled episode, so that policies which never
/// reach a terminal state still produce finite episodes.
pub const MAX_EPISODE_STEPS: usize = 50;

pub trait EpisodeGenerator {
    fn generate_episode(&mut self) -> Episode;

    fn generate(&mut self, n: usize) -> Vec<Episode> {
        (0..n).map(|_| self.generate_episode()).collect()
    }
}

/// Rolls out a fixed policy from uniformly chosen start states.
#[derive(Debug, Clone)]
pub struct PolicyEpisodeGenerator<'a, M: Mdp> {
    mdp: &'a M,
    policy: Policy,
    max_steps: usize,
    rng: StdRng,
}

impl<'a, M: Mdp> PolicyEpisodeGenerator<'a, M> {
    pub fn new(mdp: &'a M, policy: Policy, max_steps: usize, rng: StdRng) -> Self {
        Self {
            mdp,
            policy,
            max_steps,
            rng,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}

impl<M: Mdp> EpisodeGenerator for PolicyEpisodeGenerator<'_, M> {
    /// Empty when the start state is terminal. A move off the grid is
    /// recorded but leaves the agent in place.
    fn generate_episode(&mut self) -> Episode {
        let mut ep = Episode::new();
        let Some(&start) = self.mdp.states().choose(&mut self.rng) else {
            return ep;
        };

        let mut s = start;
        while !self.mdp.is_terminal(s) && ep.len() < self.max_steps {
            let Some(a) = self.policy.get(s) else {
                trace!(%s, "policy has no action, cutting episode short");
                break;
            };

            ep.push(EpisodeEvent {
                s,
                a,
                r: self.mdp.step_reward(),
            });
            s = self.mdp.attempt_move(s, a).0;
        }

        debug!(%start, len = ep.len(), "generated episode");
        ep
    }
}

/// Discounted return `sum_t gamma^t * r(index + t)` to the end of `ep`.
pub fn return_val(index: usize, ep: &[EpisodeEvent], gamma: Continous) -> Continous {
    ep.iter()
        .skip(index)
        .fold((0., 1.), |(g, discount), e| (g + discount * e.r, discount * gamma))
        .0
}

/// One uniformly random action per non-terminal state.
pub fn random_policy<M: Mdp + ?Sized>(mdp: &M, rng: &mut StdRng) -> Policy {
    mdp.non_terminal_states()
        .into_iter()
        .filter_map(|s| mdp.actions().choose(rng).map(|&a| (s, a)))
        .collect()
}
