//! This module provides functions for analyzing transition tables to detect ordering hazards
//! and other inconsistencies before execution. Findings are reported as diagnostics; a table
//! with diagnostics is still a valid table and runs exactly as written.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::config::MachineConfig;
use crate::table::TransitionTable;

/// Represents the findings the analysis of a transition table can produce.
///
/// Indices are positions in the table's lookup order, starting at zero.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Diagnostic {
    /// A write transition precedes a read transition of the same state. Write transitions
    /// match on the state alone, so the read can never be selected.
    ShadowedRead {
        state: String,
        write_index: usize,
        read_index: usize,
    },
    /// A state has more than one write transition; only the first can ever be selected.
    DuplicateWrite {
        state: String,
        first: usize,
        second: usize,
    },
    /// No transition leaves the start state, so every run is stuck on its first step.
    MissingStartState(String),
    /// No transition enters the halt state, so no run can halt.
    MissingHaltState(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ShadowedRead {
                state,
                write_index,
                read_index,
            } => write!(
                f,
                "Read rule #{} in state '{}' is shadowed by write rule #{}",
                read_index + 1,
                state,
                write_index + 1
            ),
            Diagnostic::DuplicateWrite {
                state,
                first,
                second,
            } => write!(
                f,
                "Write rule #{} in state '{}' is unreachable after write rule #{}",
                second + 1,
                state,
                first + 1
            ),
            Diagnostic::MissingStartState(state) => {
                write!(f, "No rule leaves the start state '{}'", state)
            }
            Diagnostic::MissingHaltState(state) => {
                write!(f, "No rule enters the halt state '{}'", state)
            }
        }
    }
}

/// Analyzes a transition table and returns every finding, in a deterministic order.
///
/// # Arguments
///
/// * `table` - The table to analyze.
/// * `config` - Provides the start and halt state names.
pub fn analyze(table: &TransitionTable, config: &MachineConfig) -> Vec<Diagnostic> {
    let mut diagnostics = check_write_order(table);

    if let Err(d) = check_start_state(table, config) {
        diagnostics.push(d);
    }
    if let Err(d) = check_halt_state(table, config) {
        diagnostics.push(d);
    }

    diagnostics
}

/// Reports reads and writes that can never be selected because an earlier write of the same
/// state matches first.
fn check_write_order(table: &TransitionTable) -> Vec<Diagnostic> {
    let mut first_write: HashMap<&str, usize> = HashMap::new();
    let mut diagnostics = Vec::new();

    for (index, transition) in table.iter().enumerate() {
        let state = transition.state.as_str();

        match first_write.get(state) {
            Some(&write_index) if transition.is_write() => {
                diagnostics.push(Diagnostic::DuplicateWrite {
                    state: state.to_string(),
                    first: write_index,
                    second: index,
                });
            }
            Some(&write_index) => diagnostics.push(Diagnostic::ShadowedRead {
                state: state.to_string(),
                write_index,
                read_index: index,
            }),
            None if transition.is_write() => {
                first_write.insert(state, index);
            }
            None => {}
        }
    }

    diagnostics
}

/// Checks whether any transition leaves the start state.
fn check_start_state(table: &TransitionTable, config: &MachineConfig) -> Result<(), Diagnostic> {
    if table.iter().any(|t| t.state == config.start_state) {
        return Ok(());
    }

    Err(Diagnostic::MissingStartState(config.start_state.clone()))
}

/// Checks whether any transition enters the halt state.
fn check_halt_state(table: &TransitionTable, config: &MachineConfig) -> Result<(), Diagnostic> {
    let targets: HashSet<&str> = table.iter().map(|t| t.next_state.as_str()).collect();

    if targets.contains(config.halt_state.as_str()) {
        return Ok(());
    }

    Err(Diagnostic::MissingHaltState(config.halt_state.clone()))
}
