use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Index};

pub type Discrete = i32;
pub type Continous = f64;

/// A grid cell. Coordinates are signed so that `state + action` can step off
/// the grid and be rejected by the domain afterwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct State {
    pub row: Discrete,
    pub col: Discrete,
}

impl State {
    pub const fn new(row: Discrete, col: Discrete) -> Self {
        Self { row, col }
    }
}

impl From<(Discrete, Discrete)> for State {
    fn from((row, col): (Discrete, Discrete)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Unit displacement. The order of [`Action::ALL`] is the tie-break order for
/// greedy action selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Action {
    Right,
    Left,
    Down,
    Up,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Right, Action::Left, Action::Down, Action::Up];

    /// `(d_row, d_col)`.
    pub fn delta(self) -> (Discrete, Discrete) {
        match self {
            Action::Right => (0, 1),
            Action::Left => (0, -1),
            Action::Down => (1, 0),
            Action::Up => (-1, 0),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Action::Right => 'R',
            Action::Left => 'L',
            Action::Down => 'D',
            Action::Up => 'U',
        }
    }
}

impl Add<Action> for State {
    type Output = State;

    fn add(self, a: Action) -> State {
        let (dr, dc) = a.delta();
        State::new(self.row + dr, self.col + dc)
    }
}

/// State -> estimated return. Holds one entry per state of the domain it was
/// created for.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    values: HashMap<State, Continous>,
}

impl ValueTable {
    pub fn new(states: &[State]) -> Self {
        Self {
            values: states.iter().map(|&s| (s, 0.)).collect(),
        }
    }

    pub fn get(&self, s: State) -> Option<Continous> {
        self.values.get(&s).copied()
    }

    /// Panics when `s` was not part of the enumeration the table was built from.
    pub fn set(&mut self, s: State, v: Continous) {
        match self.values.get_mut(&s) {
            Some(slot) => *slot = v,
            None => panic!("{s} is not a state of this value table."),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (State, Continous)> + '_ {
        self.values.iter().map(|(&s, &v)| (s, v))
    }

    /// Entries ordered row-major.
    pub fn sorted(&self) -> Vec<(State, Continous)> {
        let mut entries = self.iter().collect::<Vec<_>>();
        entries.sort_by_key(|&(s, _)| s);
        entries
    }
}

impl Index<State> for ValueTable {
    type Output = Continous;

    fn index(&self, s: State) -> &Continous {
        &self.values[&s]
    }
}

#[derive(serde::Serialize)]
struct ValueEntry {
    row: Discrete,
    col: Discrete,
    value: Continous,
}

impl Serialize for ValueTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.sorted();
        let mut seq = serializer.serialize_seq(Some(entries.len()))?;
        for (s, value) in entries {
            seq.serialize_element(&ValueEntry {
                row: s.row,
                col: s.col,
                value,
            })?;
        }
        seq.end()
    }
}

/// Non-terminal state -> action. Terminal states have no entry; `get` returns
/// `None` for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    actions: HashMap<State, Action>,
}

impl Policy {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, s: State) -> Option<Action> {
        self.actions.get(&s).copied()
    }

    pub fn insert(&mut self, s: State, a: Action) {
        self.actions.insert(s, a);
    }

    pub fn contains(&self, s: State) -> bool {
        self.actions.contains_key(&s)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (State, Action)> + '_ {
        self.actions.iter().map(|(&s, &a)| (s, a))
    }

    pub fn sorted(&self) -> Vec<(State, Action)> {
        let mut entries = self.iter().collect::<Vec<_>>();
        entries.sort_by_key(|&(s, _)| s);
        entries
    }
}

impl FromIterator<(State, Action)> for Policy {
    fn from_iter<I: IntoIterator<Item = (State, Action)>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

#[derive(serde::Serialize)]
struct PolicyEntry {
    row: Discrete,
    col: Discrete,
    action: Action,
}

impl Serialize for Policy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.sorted();
        let mut seq = serializer.serialize_seq(Some(entries.len()))?;
        for (s, action) in entries {
            seq.serialize_element(&PolicyEntry {
                row: s.row,
                col: s.col,
                action,
            })?;
        }
        seq.end()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EpisodeEvent {
    pub s: State,
    pub a: Action,
    pub r: Continous,
}

pub type Episode = Vec<EpisodeEvent>;
