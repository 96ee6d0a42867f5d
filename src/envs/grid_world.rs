use crate::common::defs::*;
use crate::error::GridError;
use crate::mdps::mdp::Mdp;
use itertools::Itertools;
use std::collections::HashSet;

/// Square grid world with unit step cost and a fixed set of absorbing cells.
///
/// The state space is enumerated row-major once, at construction.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: Discrete,
    terminal_states: HashSet<State>,
    states: Vec<State>,
}

impl GridWorld {
    pub fn new(size: Discrete, terminal_states: &[State]) -> Result<Self, GridError> {
        if size <= 0 {
            return Err(GridError::NonPositiveSize { size });
        }

        if let Some(&state) = terminal_states.iter().find(|s| !in_bounds(size, **s)) {
            return Err(GridError::TerminalOutOfBounds { state, size });
        }

        Ok(Self::build(size, terminal_states))
    }

    fn build(size: Discrete, terminal_states: &[State]) -> Self {
        Self {
            size,
            terminal_states: terminal_states.iter().copied().collect(),
            states: (0..size)
                .cartesian_product(0..size)
                .map(State::from)
                .collect(),
        }
    }

    pub fn size(&self) -> Discrete {
        self.size
    }

    pub fn valid(&self, s: State) -> bool {
        in_bounds(self.size, s)
    }

    /// Candidate successor, not bounds checked. See [`Mdp::attempt_move`].
    pub fn step(&self, s: State, a: Action) -> State {
        s + a
    }

    pub fn terminal_states(&self) -> Vec<State> {
        self.terminal_states.iter().copied().sorted().collect()
    }

    /// One letter per cell: `T` terminal, `R/L/D/U` the policy's action,
    /// `X` when the policy has no entry.
    pub fn render_policy(&self, pi: &Policy) -> String {
        self.render(|s| {
            if self.is_terminal(s) {
                "T".to_string()
            } else {
                pi.get(s).map_or('X', Action::symbol).to_string()
            }
        })
    }

    pub fn render_values(&self, v: &ValueTable) -> String {
        self.render(|s| format!("{:>6.2}", v.get(s).unwrap_or_default()))
    }

    fn render(&self, cell: impl Fn(State) -> String) -> String {
        (0..self.size)
            .map(|r| (0..self.size).map(|c| cell(State::new(r, c))).join(" "))
            .join("\n")
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::build(6, &[State::new(0, 1), State::new(5, 5)])
    }
}

impl Mdp for GridWorld {
    fn states(&self) -> &[State] {
        &self.states
    }

    fn actions(&self) -> &[Action] {
        &Action::ALL
    }

    fn is_terminal(&self, s: State) -> bool {
        self.terminal_states.contains(&s)
    }

    fn attempt_move(&self, s: State, a: Action) -> (State, bool) {
        let next = self.step(s, a);
        if self.valid(next) {
            (next, true)
        } else {
            (s, false)
        }
    }
}

fn in_bounds(size: Discrete, s: State) -> bool {
    (0..size).contains(&s.row) && (0..size).contains(&s.col)
}
