//! Human-readable rendering of a machine after a step.

use std::fmt;

use crate::machine::PostMachine;
use crate::types::EMPTY_SYMBOL_DISPLAY;

const FRAME_WIDTH: usize = 72;

/// A boxed snapshot of a machine, labelled with the iteration it was taken at.
///
/// ```text
/// ╔═════════════════════════ Iteration: 2 ══════════════════════════╗
/// ║ State:      q                                                    ║
/// ║ Tape:       [b]                                                  ║
/// ║ Transition: (s, ε) -> (q, b, W)                                  ║
/// ╚══════════════════════════════════════════════════════════════════╝
/// ```
pub struct Trace<'a, 't> {
    machine: &'a PostMachine<'t>,
    iteration: usize,
}

impl<'a, 't> Trace<'a, 't> {
    pub fn new(machine: &'a PostMachine<'t>, iteration: usize) -> Self {
        Self { machine, iteration }
    }

    fn transition_line(&self) -> String {
        match self.machine.last_transition() {
            Some(t) => format!(
                "({}, {}) -> ({}, {}, {})",
                t.state,
                display_symbol(t.declared_symbol()),
                t.next_state,
                display_symbol(t.written_symbol().unwrap_or("")),
                t.command.tag()
            ),
            None => "-".to_string(),
        }
    }
}

/// Renders the empty symbol as `ε`.
pub fn display_symbol(symbol: &str) -> &str {
    if symbol.is_empty() {
        EMPTY_SYMBOL_DISPLAY
    } else {
        symbol
    }
}

/// Renders a tape as `[a b c]`.
pub fn display_tape<'s>(symbols: impl IntoIterator<Item = &'s String>) -> String {
    let joined = symbols
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{joined}]")
}

impl fmt::Display for Trace<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = FRAME_WIDTH - 2;
        let title = format!(" Iteration: {} ", self.iteration);

        writeln!(f, "╔{:═^inner$}╗", title)?;
        for (label, value) in [
            ("State:", self.machine.state().to_string()),
            ("Tape:", display_tape(self.machine.tape())),
            ("Transition:", self.transition_line()),
        ] {
            let line = format!(" {label:<12}{value}");
            writeln!(f, "║{line:<inner$}║")?;
        }
        write!(f, "╚{}╝", "═".repeat(inner))
    }
}
