//! This crate provides the core logic for a Post Machine interpreter.
//! It includes modules for parsing transition tables, running machines over queue-like tapes,
//! analyzing tables for ordering hazards, rendering traces, and persisting run history.

pub mod analyzer;
pub mod config;
pub mod history;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod trace;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `Diagnostic` enum from the analyzer module.
pub use analyzer::{analyze, Diagnostic};
/// Re-exports the run configuration.
pub use config::MachineConfig;
/// Re-exports history persistence types.
pub use history::{History, RunReport};
/// Re-exports the `TableLoader` struct from the loader module.
pub use loader::{TableEntry, TableLoader};
/// Re-exports the `PostMachine` struct from the machine module.
pub use machine::PostMachine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `TableInfo`, `TableManager`, and `TABLES` from the programs module.
pub use programs::{TableInfo, TableManager, TABLES};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the `Trace` renderer.
pub use trace::Trace;
/// Re-exports the types describing transitions, outcomes, and errors.
pub use types::{
    Command, PostMachineError, RunOutcome, StepResult, StuckReason, Transition, MAX_TABLE_SIZE,
};
