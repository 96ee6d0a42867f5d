use gridworld_rl::config::AppConfig;
use gridworld_rl::mdps::solvers::{
    mc_methods::MonteCarloEvaluator, policy_iteration::policy_iteration, td_methods::TdZero,
    value_iteration::value_iteration,
};
use gridworld_rl::*;
use rand::prelude::*;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(serde::Serialize)]
struct Report<'a> {
    config: &'a AppConfig,
    value_iteration: (ValueTable, Policy),
    policy_iteration: Policy,
    mc_first_visit: ValueTable,
    mc_every_visit: ValueTable,
    td_zero: ValueTable,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("gridworld.json"), PathBuf::from);
    let config = AppConfig::load_or_default(&path)?;
    config.validate()?;
    let world = config.grid_world()?;
    info!(size = world.size(), terminals = ?world.terminal_states(), "grid world ready");

    let vi = value_iteration(
        &world,
        config.value_iteration.sweeps,
        config.value_iteration.discount,
    );
    eprintln!("Value iteration ({} sweeps):", config.value_iteration.sweeps);
    eprintln!("{}\n{}\n", world.render_values(&vi.0), world.render_policy(&vi.1));

    let rng = &mut StdRng::seed_from_u64(config.seed);
    let pi = policy_iteration(
        &world,
        config.policy_iteration.rounds,
        config.policy_iteration.evaluation_sweeps,
        config.policy_iteration.discount,
        rng,
    );
    eprintln!("Policy iteration ({} rounds):", config.policy_iteration.rounds);
    eprintln!("{}\n", world.render_policy(&pi));

    let max_steps = config.sampling.max_episode_steps;
    let mc_first = MonteCarloEvaluator::with_random_policy(
        &world,
        config.monte_carlo.discount,
        max_steps,
        StdRng::seed_from_u64(rng.gen()),
    )
    .first_visit(config.monte_carlo.iterations);
    let mc_every = MonteCarloEvaluator::with_random_policy(
        &world,
        config.monte_carlo.discount,
        max_steps,
        StdRng::seed_from_u64(rng.gen()),
    )
    .every_visit(config.monte_carlo.iterations);
    eprintln!("Monte Carlo, first visit:\n{}\n", world.render_values(&mc_first));
    eprintln!("Monte Carlo, every visit:\n{}\n", world.render_values(&mc_every));

    let td = TdZero::with_random_policy(
        &world,
        config.td.step_size,
        config.td.discount,
        max_steps,
        StdRng::seed_from_u64(rng.gen()),
    )
    .exec(config.td.iterations);
    eprintln!("TD(0):\n{}\n", world.render_values(&td));

    let report = Report {
        config: &config,
        value_iteration: vi,
        policy_iteration: pi,
        mc_first_visit: mc_first,
        mc_every_visit: mc_every,
        td_zero: td,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
