//! This module defines the `TransitionTable`, the ordered and immutable rule set a Post Machine
//! consults on every step.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::types::Transition;

/// An ordered collection of transitions. Order is significant: the first matching
/// transition wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTable {
    transitions: Vec<Transition>,
}

impl TransitionTable {
    /// Creates a table from transitions in lookup order.
    pub fn new(transitions: Vec<Transition>) -> Self {
        Self { transitions }
    }

    /// Finds the first transition applicable in `state` with `front` at the head of the tape.
    ///
    /// Read transitions must match `front`; write transitions match on the state alone.
    /// The scan is linear, tables in this domain hold tens of rules.
    pub fn find_rule(&self, state: &str, front: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.matches(state, front))
    }

    /// Returns the transitions in lookup order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Returns every state named by the table, as a source or a destination, sorted.
    pub fn states(&self) -> BTreeSet<&str> {
        self.transitions
            .iter()
            .flat_map(|t| [t.state.as_str(), t.next_state.as_str()])
            .collect()
    }
}

/// Renders the table in source form, one transition per line.
impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for transition in &self.transitions {
            writeln!(f, "{transition}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Command;

    #[test]
    fn test_first_match_wins() {
        let table = TransitionTable::new(vec![
            Transition::read("s", "a", "first"),
            Transition::read("s", "a", "second"),
        ]);

        let found = table.find_rule("s", "a").unwrap();
        assert_eq!(found.next_state, "first");
    }

    #[test]
    fn test_read_selected_by_front_symbol() {
        let table = TransitionTable::new(vec![
            Transition::read("s", "a", "qa"),
            Transition::read("s", "b", "qb"),
        ]);

        assert_eq!(table.find_rule("s", "b").unwrap().next_state, "qb");
        assert!(table.find_rule("s", "c").is_none());
        assert!(table.find_rule("q", "a").is_none());
    }

    #[test]
    fn test_write_after_reads_is_fallback() {
        let table = TransitionTable::new(vec![
            Transition::read("s", "a", "qa"),
            Transition::write("s", "", "qw", "#"),
        ]);

        assert_eq!(table.find_rule("s", "a").unwrap().next_state, "qa");
        assert_eq!(table.find_rule("s", "b").unwrap().next_state, "qw");
        assert_eq!(table.find_rule("s", "").unwrap().next_state, "qw");
    }

    #[test]
    fn test_write_before_reads_shadows_them() {
        let table = TransitionTable::new(vec![
            Transition::write("s", "x", "qw", "#"),
            Transition::read("s", "a", "qa"),
        ]);

        let found = table.find_rule("s", "a").unwrap();
        assert!(matches!(found.command, Command::Write { .. }));
        assert_eq!(found.next_state, "qw");
    }

    #[test]
    fn test_other_state_writes_do_not_shadow() {
        let table = TransitionTable::new(vec![
            Transition::write("q", "", "q", "#"),
            Transition::write("r", "a", "r", "#"),
            Transition::read("s", "a", "qa"),
        ]);

        assert_eq!(table.find_rule("s", "a").unwrap().next_state, "qa");
    }

    #[test]
    fn test_states_and_display() {
        let table = TransitionTable::new(vec![
            Transition::read("s", "a", "q"),
            Transition::write("q", "", "h", "b"),
        ]);

        assert_eq!(table.states().into_iter().collect::<Vec<_>>(), vec!["h", "q", "s"]);
        assert_eq!(table.to_string(), "<s><a><q>\n<q><><h><b>\n");
    }
}
