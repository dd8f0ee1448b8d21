//! Persistence of run history.
//!
//! A run's tape snapshots can be written as a plain-text history file (one tape per line)
//! or as a JSON `RunReport` that also carries the outcome.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::machine::PostMachine;
use crate::types::{PostMachineError, RunOutcome};

/// Timestamp format used in history file names.
const TIMESTAMP_FORMAT: &str = "%d_%m_%y_%H_%M_%S";

/// Tape snapshots of a run: the initial tape, then the tape after every applied step,
/// including the step that entered the halt state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    snapshots: Vec<Vec<String>>,
}

impl History {
    pub fn from_machine(machine: &PostMachine<'_>) -> Self {
        Self {
            snapshots: machine.history().to_vec(),
        }
    }

    /// Returns the history in text form: every tape concatenated, one per line.
    pub fn to_text(&self) -> String {
        self.snapshots
            .iter()
            .map(|tape| format!("{}\n", tape.concat()))
            .collect()
    }

    /// Writes the history to `history_<table>_<timestamp>.txt` inside `dir`, creating the
    /// directory if needed, and returns the path written.
    pub fn write_text(&self, dir: &Path, table_name: &str) -> Result<PathBuf, PostMachineError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let path = dir.join(format!("history_{table_name}_{timestamp}.txt"));

        write_file(&path, &self.to_text())?;
        debug!(path = %path.display(), snapshots = self.snapshots.len(), "history written");

        Ok(path)
    }
}

/// Everything known about a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub table: String,
    pub word: String,
    pub outcome: RunOutcome,
    pub steps: usize,
    pub final_state: String,
    pub final_tape: String,
    pub history: History,
}

impl RunReport {
    pub fn new(table: &str, machine: &PostMachine<'_>, outcome: RunOutcome) -> Self {
        Self {
            table: table.to_string(),
            word: machine.word().to_string(),
            outcome,
            steps: machine.step_count(),
            final_state: machine.state().to_string(),
            final_tape: machine.tape_string(),
            history: History::from_machine(machine),
        }
    }

    pub fn to_json(&self) -> Result<String, PostMachineError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PostMachineError::HistoryError(format!("Failed to encode report: {}", e)))
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), PostMachineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PostMachineError::HistoryError(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    fs::write(path, content).map_err(|e| {
        PostMachineError::HistoryError(format!("Failed to write {}: {}", path.display(), e))
    })
}
