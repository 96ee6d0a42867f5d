use super::common::round_to;
use crate::common::defs::*;
use crate::mdps::mdp::Mdp;
use crate::mdps::mdp_simulator::*;
use rand::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

/// Decimal places kept in the published estimates.
const MC_DECIMALS: usize = 2;

/// Monte Carlo policy evaluation of one fixed policy.
///
/// The policy is never improved: every call samples fresh episodes under the
/// same policy and averages their returns.
pub struct MonteCarloEvaluator<'a, M: Mdp> {
    mdp: &'a M,
    ep_gen: PolicyEpisodeGenerator<'a, M>,
    gamma: Continous,
}

impl<'a, M: Mdp> MonteCarloEvaluator<'a, M> {
    pub fn new(mdp: &'a M, policy: Policy, gamma: Continous, max_steps: usize, rng: StdRng) -> Self {
        Self {
            mdp,
            ep_gen: PolicyEpisodeGenerator::new(mdp, policy, max_steps, rng),
            gamma,
        }
    }

    /// Evaluates a policy drawn uniformly at random from `rng`, which then
    /// drives episode sampling as well.
    pub fn with_random_policy(mdp: &'a M, gamma: Continous, max_steps: usize, mut rng: StdRng) -> Self {
        let policy = random_policy(mdp, &mut rng);
        Self::new(mdp, policy, gamma, max_steps, rng)
    }

    pub fn policy(&self) -> &Policy {
        self.ep_gen.policy()
    }

    pub fn first_visit(&mut self, iterations: usize) -> ValueTable {
        mc_first_visit(&mut self.ep_gen, self.mdp.states(), self.gamma, iterations)
    }

    pub fn every_visit(&mut self, iterations: usize) -> ValueTable {
        mc_every_visit(&mut self.ep_gen, self.mdp.states(), self.gamma, iterations)
    }
}

/// Ref: https://youtu.be/P0ZvxeQqv0A?si=RLKdOUTNEfKXE63C
pub fn mc_first_visit(
    ep_gen: &mut dyn EpisodeGenerator,
    states: &[State],
    gamma: Continous,
    n_ep: usize,
) -> ValueTable {
    mc_core(ep_gen, states, gamma, n_ep, is_first_visit)
}

/// Every occurrence of a state contributes a sample, repeats within one
/// episode included.
pub fn mc_every_visit(
    ep_gen: &mut dyn EpisodeGenerator,
    states: &[State],
    gamma: Continous,
    n_ep: usize,
) -> ValueTable {
    mc_core(ep_gen, states, gamma, n_ep, |_, _| true)
}

/// Samples `n_ep` episodes one at a time and keeps a running mean of the
/// returns accepted by `counts_visit`. States never sampled keep 0.
pub fn mc_core(
    ep_gen: &mut dyn EpisodeGenerator,
    states: &[State],
    gamma: Continous,
    n_ep: usize,
    counts_visit: fn(&[EpisodeEvent], usize) -> bool,
) -> ValueTable {
    let mut v = ValueTable::new(states);
    let mut returns = HashMap::<State, Continous>::new();
    let mut visits = HashMap::<State, usize>::new();

    for e in 0..n_ep {
        let ep = ep_gen.generate_episode();
        let gs = returns_of(&ep, gamma);

        for (t, g) in gs.into_iter().enumerate() {
            if !counts_visit(&ep, t) {
                continue;
            }

            let s = ep[t].s;
            let sum = returns.entry(s).or_default();
            *sum += g;
            let n = visits.entry(s).or_default();
            *n += 1;
            v.set(s, round_to(*sum / *n as Continous, MC_DECIMALS));
        }

        debug!(episode = e, len = ep.len(), "monte carlo episode");
    }

    info!(n_ep, visited = visits.len(), "monte carlo evaluation done");
    v
}

/// `G_t` for every step, accumulated back to front.
fn returns_of(ep: &[EpisodeEvent], gamma: Continous) -> Vec<Continous> {
    let mut gs = vec![0.; ep.len()];
    let mut g = 0.;
    for t in (0..ep.len()).rev() {
        g = ep[t].r + gamma * g;
        gs[t] = g;
    }

    gs
}

fn is_first_visit(ep: &[EpisodeEvent], t: usize) -> bool {
    !ep.iter().take(t).any(|x| x.s == ep[t].s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::grid_world::GridWorld;
    use float_eq::*;

    struct SimpleEnv {
        pub episodes: Vec<Episode>,
        pub next: usize,
    }

    impl EpisodeGenerator for SimpleEnv {
        fn generate_episode(&mut self) -> Episode {
            let ep = self.episodes[self.next % self.episodes.len()].clone();
            self.next += 1;
            ep
        }
    }

    fn ev(col: Discrete, r: Continous) -> EpisodeEvent {
        EpisodeEvent {
            s: State::new(0, col),
            a: Action::Right,
            r,
        }
    }

    fn toy_env() -> SimpleEnv {
        SimpleEnv {
            episodes: vec![
                vec![ev(1, -3.), ev(4, -2.), ev(1, -1.), ev(2, -3.)],
                vec![ev(1, -3.), ev(4, 0.)],
                vec![ev(2, -3.), ev(4, 0.)],
            ],
            next: 0,
        }
    }

    fn row_states() -> Vec<State> {
        (0..6).map(|c| State::new(0, c)).collect()
    }

    fn values(v: &ValueTable) -> Vec<Continous> {
        v.sorted().into_iter().map(|(_, x)| x).collect()
    }

    #[test]
    fn toy_example_with_first_visit() {
        let v = mc_first_visit(&mut toy_env(), &row_states(), 0.9, 3);

        assert_float_eq!(
            values(&v),
            vec![0., -5.4, -3., 0., -1.78, 0.],
            abs_all <= 1e-9
        );
    }

    #[test]
    fn toy_example_with_every_visit() {
        let v = mc_every_visit(&mut toy_env(), &row_states(), 0.9, 3);

        assert_float_eq!(
            values(&v),
            vec![0., -4.83, -3., 0., -1.78, 0.],
            abs_all <= 1e-9
        );
    }

    #[test]
    fn empty_episodes_change_nothing() {
        let env = &mut SimpleEnv {
            episodes: vec![vec![]],
            next: 0,
        };
        let v = mc_every_visit(env, &row_states(), 1., 10);

        assert_eq!(v, ValueTable::new(&row_states()));
    }

    #[test]
    fn first_visit_converges_next_to_the_terminal() {
        let w = GridWorld::new(3, &[State::new(0, 0)]).unwrap();
        let mut pi: Policy = w
            .non_terminal_states()
            .into_iter()
            .map(|s| (s, Action::Left))
            .collect();
        pi.insert(State::new(1, 0), Action::Up);
        pi.insert(State::new(2, 0), Action::Up);

        let mc = &mut MonteCarloEvaluator::new(
            &w,
            pi,
            1.,
            MAX_EPISODE_STEPS,
            StdRng::seed_from_u64(2718),
        );
        let v = mc.first_visit(500);

        assert_float_eq!(v[State::new(0, 1)], -1., abs <= 1e-9);
        assert_float_eq!(v[State::new(1, 0)], -1., abs <= 1e-9);
        assert_float_eq!(v[State::new(1, 1)], -2., abs <= 1e-9);
        assert_float_eq!(v[State::new(2, 2)], -4., abs <= 1e-9);
        assert_float_eq!(v[State::new(0, 0)], 0., abs <= 1e-9);
    }

    #[test]
    fn every_visit_averages_repeated_states() {
        // (0, 0) bumps into the left wall until the step cap.
        let w = GridWorld::new(1, &[]).unwrap();
        let pi = Policy::from_iter([(State::new(0, 0), Action::Left)]);

        let first = MonteCarloEvaluator::new(
            &w,
            pi.clone(),
            1.,
            MAX_EPISODE_STEPS,
            StdRng::seed_from_u64(1),
        )
        .first_visit(3);
        let every =
            MonteCarloEvaluator::new(&w, pi, 1., MAX_EPISODE_STEPS, StdRng::seed_from_u64(1))
                .every_visit(3);

        assert_float_eq!(first[State::new(0, 0)], -50., abs <= 1e-9);
        assert_float_eq!(every[State::new(0, 0)], -25.5, abs <= 1e-9);
    }

    #[test]
    fn random_policy_evaluation_is_reproducible() {
        let w = GridWorld::default();
        let run = || {
            MonteCarloEvaluator::with_random_policy(&w, 1., MAX_EPISODE_STEPS, StdRng::seed_from_u64(42))
                .first_visit(200)
        };

        let v = run();
        assert_eq!(v, run());
        assert_eq!(v.len(), 36);
        assert!(v.iter().all(|(_, x)| x <= 0.));
        for s in w.terminal_states() {
            assert_eq!(v[s], 0.);
        }
    }
}
