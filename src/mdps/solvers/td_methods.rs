use super::common::round_to;
use crate::common::defs::*;
use crate::mdps::mdp::Mdp;
use crate::mdps::mdp_simulator::random_policy;
use rand::prelude::*;
use tracing::{debug, info, trace};

/// Decimal places kept after every update.
const TD_DECIMALS: usize = 1;

/// One-step temporal difference evaluation, TD(0) - Sutton & Barto 2018, 6.1.
///
/// Values are updated online after every single transition.
pub struct TdZero<'a, M: Mdp> {
    mdp: &'a M,
    policy: Policy,
    step_size: Continous,
    gamma: Continous,
    max_steps: usize,
    rng: StdRng,
}

impl<'a, M: Mdp> TdZero<'a, M> {
    pub fn new(
        mdp: &'a M,
        policy: Policy,
        step_size: Continous,
        gamma: Continous,
        max_steps: usize,
        rng: StdRng,
    ) -> Self {
        Self {
            mdp,
            policy,
            step_size,
            gamma,
            max_steps,
            rng,
        }
    }

    pub fn with_random_policy(
        mdp: &'a M,
        step_size: Continous,
        gamma: Continous,
        max_steps: usize,
        mut rng: StdRng,
    ) -> Self {
        let policy = random_policy(mdp, &mut rng);
        Self::new(mdp, policy, step_size, gamma, max_steps, rng)
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Runs `iterations` walks of at most `max_steps` transitions, each from a
    /// uniformly chosen start state.
    pub fn exec(&mut self, iterations: usize) -> ValueTable {
        let mut v = ValueTable::new(self.mdp.states());

        for i in 0..iterations {
            let Some(&start) = self.mdp.states().choose(&mut self.rng) else {
                break;
            };

            let mut s = start;
            let mut steps = 0;
            while !self.mdp.is_terminal(s) && steps < self.max_steps {
                let Some(a) = self.policy.get(s) else {
                    trace!(%s, "policy has no action, ending walk");
                    break;
                };

                steps += 1;
                let (next, _) = self.mdp.attempt_move(s, a);
                td_update(
                    &mut v,
                    s,
                    next,
                    self.mdp.step_reward(),
                    self.step_size,
                    self.gamma,
                );
                trace!(%s, %next, v = v[s], "td(0) update");
                s = next;
            }

            debug!(iteration = i, %start, steps, "td(0) walk");
        }

        info!(iterations, step_size = self.step_size, "td(0) evaluation done");
        v
    }
}

/// `V(s) <- round(V(s) + alpha * (r + gamma * V(s') - V(s)), 1)`.
pub fn td_update(
    v: &mut ValueTable,
    s: State,
    s_next: State,
    r: Continous,
    step_size: Continous,
    gamma: Continous,
) {
    let td_error = r + gamma * v[s_next] - v[s];
    v.set(s, round_to(v[s] + step_size * td_error, TD_DECIMALS));
}

/// `iterations` walks of TD(0) under a fixed policy.
pub fn td_zero<M: Mdp>(
    mdp: &M,
    policy: Policy,
    step_size: Continous,
    gamma: Continous,
    max_steps: usize,
    iterations: usize,
    rng: StdRng,
) -> ValueTable {
    TdZero::new(mdp, policy, step_size, gamma, max_steps, rng).exec(iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::grid_world::GridWorld;
    use crate::mdps::mdp_simulator::MAX_EPISODE_STEPS;
    use float_eq::*;

    #[test]
    fn single_update_from_zero() {
        let w = GridWorld::new(2, &[]).unwrap();
        let mut v = ValueTable::new(w.states());
        td_update(&mut v, State::new(0, 0), State::new(0, 1), -1., 0.5, 1.);

        assert_float_eq!(v[State::new(0, 0)], -0.5, abs <= 1e-12);
        assert_float_eq!(v[State::new(0, 1)], 0., abs <= 1e-12);
    }

    #[test]
    fn self_transition_uses_own_value() {
        let w = GridWorld::new(1, &[]).unwrap();
        let mut v = ValueTable::new(w.states());
        let s = State::new(0, 0);
        td_update(&mut v, s, s, -1., 0.5, 1.);
        td_update(&mut v, s, s, -1., 0.5, 1.);

        assert_float_eq!(v[s], -1., abs <= 1e-12);
    }

    #[test]
    fn walks_next_to_a_terminal_settle() {
        // -0.5, -0.8, -0.9, then -0.95 is stored as -0.9499.. and rounds back to -0.9.
        let w = GridWorld::new(2, &[State::new(0, 1)]).unwrap();
        let pi = Policy::from_iter([
            (State::new(0, 0), Action::Right),
            (State::new(1, 0), Action::Up),
            (State::new(1, 1), Action::Up),
        ]);
        let v = td_zero(&w, pi, 0.5, 1., MAX_EPISODE_STEPS, 200, StdRng::seed_from_u64(2718));

        assert_float_eq!(v[State::new(0, 0)], -0.9, abs <= 1e-12);
        assert_float_eq!(v[State::new(1, 1)], -0.9, abs <= 1e-12);
        assert_float_eq!(v[State::new(0, 1)], 0., abs <= 1e-12);
    }

    #[test]
    fn trapped_walk_stops_at_the_step_cap() {
        let w = GridWorld::new(1, &[]).unwrap();
        let pi = Policy::from_iter([(State::new(0, 0), Action::Up)]);
        let v = td_zero(&w, pi, 0.5, 1., MAX_EPISODE_STEPS, 1, StdRng::seed_from_u64(1));

        // Every bump costs exactly 0.5.
        assert_float_eq!(v[State::new(0, 0)], -25., abs <= 1e-12);
    }

    #[test]
    fn random_policy_runs_are_reproducible() {
        let w = GridWorld::default();
        let run = || {
            TdZero::with_random_policy(&w, 0.5, 1., MAX_EPISODE_STEPS, StdRng::seed_from_u64(3))
                .exec(100)
        };

        let v = run();
        assert_eq!(v, run());
        assert!(v.iter().all(|(_, x)| x <= 0.));
        for s in w.terminal_states() {
            assert_eq!(v[s], 0.);
        }
    }
}
