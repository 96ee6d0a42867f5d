use gridworld_rl::*;

/// Left along the top row, Up elsewhere: the shortest path to `(0, 0)`.
#[allow(dead_code)]
pub fn towards_origin(w: &GridWorld) -> Policy {
    w.non_terminal_states()
        .into_iter()
        .map(|s| (s, if s.row == 0 { Action::Left } else { Action::Up }))
        .collect()
}

#[allow(dead_code)]
pub fn values(v: &ValueTable) -> Vec<Continous> {
    v.sorted().into_iter().map(|(_, x)| x).collect()
}

#[allow(dead_code)]
pub fn assert_policy_complete(w: &GridWorld, pi: &Policy) {
    for &s in w.states() {
        assert_eq!(
            pi.contains(s),
            !w.is_terminal(s),
            "{s} policy entry does not match terminal status"
        );
    }
    assert_eq!(pi.len(), w.non_terminal_states().len());
}
