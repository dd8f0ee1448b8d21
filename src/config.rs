//! Run configuration: the names of the distinguished states and the step budget.

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_HALT_STATE, DEFAULT_START_STATE, MAX_EXECUTION_STEPS};

/// Settings shared by every machine built from the same table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// The state a fresh machine is placed in.
    pub start_state: String,
    /// Entering this state ends the run successfully.
    pub halt_state: String,
    /// Step budget used by drivers when none is given explicitly.
    pub max_steps: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            start_state: DEFAULT_START_STATE.to_string(),
            halt_state: DEFAULT_HALT_STATE.to_string(),
            max_steps: MAX_EXECUTION_STEPS,
        }
    }
}

impl MachineConfig {
    pub fn with_start_state(mut self, state: impl Into<String>) -> Self {
        self.start_state = state.into();
        self
    }

    pub fn with_halt_state(mut self, state: impl Into<String>) -> Self {
        self.halt_state = state.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MachineConfig::default();
        assert_eq!(config.start_state, "s");
        assert_eq!(config.halt_state, "h");
        assert_eq!(config.max_steps, MAX_EXECUTION_STEPS);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MachineConfig = serde_json::from_str(r#"{"halt_state": "accept"}"#).unwrap();
        assert_eq!(config.start_state, "s");
        assert_eq!(config.halt_state, "accept");
        assert_eq!(config.max_steps, MAX_EXECUTION_STEPS);
    }
}
