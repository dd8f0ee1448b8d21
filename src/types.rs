//! This module defines the core data structures and types used throughout the Post Machine
//! interpreter, including transitions, step and run outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The state a machine starts in unless configured otherwise.
pub const DEFAULT_START_STATE: &str = "s";
/// The state that signals successful completion unless configured otherwise.
pub const DEFAULT_HALT_STATE: &str = "h";
/// The symbol shown in place of the empty symbol when rendering.
pub const EMPTY_SYMBOL_DISPLAY: &str = "ε";
/// The maximum allowed size for a transition table source in bytes.
pub const MAX_TABLE_SIZE: usize = 65536; // 64KB
/// The default number of steps to execute before giving up on a run.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// A single rule of a Post Machine transition table.
///
/// A transition is selected when the machine is in `state` and, for read transitions,
/// the symbol at the front of the tape equals the transition's symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state this transition leaves from.
    pub state: String,
    /// The state the machine adopts after applying this transition.
    pub next_state: String,
    /// What the transition does to the tape.
    pub command: Command,
}

/// The tape operation of a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Remove the front symbol of the tape. Matches only when the front symbol equals `symbol`.
    Read { symbol: String },
    /// Append `symbol` to the back of the tape.
    ///
    /// `declared` is the match field written in the table source. It is kept for display
    /// and round-tripping only: write transitions match on state alone, so a write placed
    /// before reads of the same state shadows them. This mirrors existing tables and is
    /// not how new tables should be designed.
    Write { symbol: String, declared: String },
}

impl Transition {
    /// Creates a read transition `<state><symbol><next_state>`.
    pub fn read(state: &str, symbol: &str, next_state: &str) -> Self {
        Self {
            state: state.to_string(),
            next_state: next_state.to_string(),
            command: Command::Read {
                symbol: symbol.to_string(),
            },
        }
    }

    /// Creates a write transition `<state><declared><next_state><symbol>`.
    pub fn write(state: &str, declared: &str, next_state: &str, symbol: &str) -> Self {
        Self {
            state: state.to_string(),
            next_state: next_state.to_string(),
            command: Command::Write {
                symbol: symbol.to_string(),
                declared: declared.to_string(),
            },
        }
    }

    /// Returns `true` if this transition applies in `state` with `front` at the head of the tape.
    pub fn matches(&self, state: &str, front: &str) -> bool {
        if self.state != state {
            return false;
        }

        match &self.command {
            Command::Read { symbol } => symbol == front,
            Command::Write { .. } => true,
        }
    }

    /// The match field as written in the source, for both reads and writes.
    pub fn declared_symbol(&self) -> &str {
        match &self.command {
            Command::Read { symbol } => symbol,
            Command::Write { declared, .. } => declared,
        }
    }

    /// The symbol a write transition appends, if any.
    pub fn written_symbol(&self) -> Option<&str> {
        match &self.command {
            Command::Read { .. } => None,
            Command::Write { symbol, .. } => Some(symbol),
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self.command, Command::Write { .. })
    }
}

impl Command {
    /// Single-letter tag used in traces: `R` for read, `W` for write.
    pub fn tag(&self) -> char {
        match self {
            Command::Read { .. } => 'R',
            Command::Write { .. } => 'W',
        }
    }
}

/// Renders the transition in table source form.
impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.command {
            Command::Read { symbol } => write!(f, "<{}><{}><{}>", self.state, symbol, self.next_state),
            Command::Write { symbol, declared } => write!(
                f,
                "<{}><{}><{}><{}>",
                self.state, declared, self.next_state, symbol
            ),
        }
    }
}

/// Represents the outcome of a single machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepResult {
    /// A transition was found and applied.
    Applied,
    /// No transition matches the current state and front symbol. The machine is unchanged.
    NoRuleFound,
    /// A transition matched but could not be applied (a read against an empty tape).
    /// The machine is unchanged.
    ApplyFailed,
}

/// Why a run stopped without reaching the halt state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StuckReason {
    NoRuleFound,
    ApplyFailed,
}

/// Represents the outcome of a bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The machine entered the halt state; the word was accepted.
    Halted,
    /// The machine could not continue; the word cannot be processed.
    Stuck(StuckReason),
    /// The step budget ran out before the machine halted.
    StepLimitExceeded,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Halted => write!(f, "halted"),
            RunOutcome::Stuck(StuckReason::NoRuleFound) => write!(f, "stuck: no rule found"),
            RunOutcome::Stuck(StuckReason::ApplyFailed) => write!(f, "stuck: rule could not be applied"),
            RunOutcome::StepLimitExceeded => write!(f, "step limit exceeded"),
        }
    }
}

/// Represents the errors that can occur while building, loading, or persisting Post Machine data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PostMachineError {
    /// A rule line has an unsupported number of fields.
    #[error("Unexpected rule format on line {line}: {text}")]
    TableFormat { line: usize, text: String },
    /// A rule line is not a sequence of `<...>` fields.
    #[error("Table parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The table source cannot be opened or read.
    #[error("Table source unavailable: {0}")]
    TableSourceUnavailable(String),
    /// Run history or reports cannot be written.
    #[error("History error: {0}")]
    HistoryError(String),
    /// A lookup or structural check failed.
    #[error("Validation error: {0}")]
    ValidationError(String),
}
