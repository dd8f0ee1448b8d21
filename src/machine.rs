//! This module defines the `PostMachine` struct, which runs a Post Machine over a single
//! queue-like tape. It handles the machine's state, tape operations, rule application,
//! halting detection, and the bounded run loop.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::MachineConfig;
use crate::table::TransitionTable;
use crate::types::{Command, RunOutcome, StepResult, StuckReason, Transition};

/// Represents a Post Machine processing one word against one transition table.
///
/// The table is borrowed and never mutated, so any number of machines can run against
/// the same table, including from different threads.
#[derive(Debug, Clone)]
pub struct PostMachine<'t> {
    table: &'t TransitionTable,
    config: MachineConfig,
    word: String,
    state: String,
    tape: VecDeque<String>,
    last_transition: Option<Transition>,
    history: Vec<Vec<String>>,
    step_count: usize,
}

impl<'t> PostMachine<'t> {
    /// Creates a machine in the configured start state with `word` on the tape,
    /// one symbol per character.
    ///
    /// Surrounding whitespace of the word is ignored; an empty word gives an empty tape.
    pub fn new(word: &str, table: &'t TransitionTable, config: MachineConfig) -> Self {
        let word = word.trim().to_string();
        let tape = split_word(&word);

        Self {
            table,
            state: config.start_state.clone(),
            history: vec![tape.iter().cloned().collect()],
            config,
            word,
            tape,
            last_transition: None,
            step_count: 0,
        }
    }

    /// Creates a machine with the default configuration.
    pub fn with_defaults(word: &str, table: &'t TransitionTable) -> Self {
        Self::new(word, table, MachineConfig::default())
    }

    /// Executes a single step.
    ///
    /// Looks up the first applicable transition for the current state and front symbol,
    /// applies its tape operation, adopts its destination state, and records the new tape
    /// in the history. When the step is not applied the machine is left untouched.
    ///
    /// # Returns
    ///
    /// * `StepResult::Applied` if a transition was applied.
    /// * `StepResult::NoRuleFound` if no transition matches.
    /// * `StepResult::ApplyFailed` if a read transition matched an empty tape.
    pub fn step(&mut self) -> StepResult {
        let transition = match self.table.find_rule(&self.state, self.front_symbol()) {
            Some(t) => t,
            None => {
                debug!(state = %self.state, front = %self.front_symbol(), "no rule found");
                return StepResult::NoRuleFound;
            }
        };

        match &transition.command {
            Command::Read { .. } => {
                if self.tape.pop_front().is_none() {
                    debug!(state = %self.state, "read against an empty tape");
                    return StepResult::ApplyFailed;
                }
            }
            Command::Write { symbol, .. } => self.tape.push_back(symbol.clone()),
        }

        trace!(step = self.step_count + 1, transition = %transition, "applied");

        self.state = transition.next_state.clone();
        self.last_transition = Some(transition.clone());
        self.step_count += 1;
        self.history.push(self.tape.iter().cloned().collect());

        StepResult::Applied
    }

    /// Runs the machine for at most `max_steps` steps.
    ///
    /// The halting transition is applied before the halt check, so a run that halts on its
    /// last allowed step still reports `Halted`.
    pub fn run(&mut self, max_steps: usize) -> RunOutcome {
        self.run_with_observer(max_steps, |_| {})
    }

    /// Runs the machine with the step budget from its configuration.
    pub fn run_to_completion(&mut self) -> RunOutcome {
        self.run(self.config.max_steps)
    }

    /// Like `run`, calling `observer` after every applied step that did not halt the machine.
    pub fn run_with_observer<F>(&mut self, max_steps: usize, mut observer: F) -> RunOutcome
    where
        F: FnMut(&PostMachine<'t>),
    {
        let outcome = self.run_loop(max_steps, &mut observer);
        debug!(word = %self.word, steps = self.step_count, %outcome, "run finished");
        outcome
    }

    fn run_loop<F>(&mut self, max_steps: usize, observer: &mut F) -> RunOutcome
    where
        F: FnMut(&PostMachine<'t>),
    {
        for _ in 0..max_steps {
            match self.step() {
                StepResult::Applied => {}
                StepResult::NoRuleFound => return RunOutcome::Stuck(StuckReason::NoRuleFound),
                StepResult::ApplyFailed => return RunOutcome::Stuck(StuckReason::ApplyFailed),
            }

            if self.is_halted() {
                return RunOutcome::Halted;
            }

            observer(self);
        }

        RunOutcome::StepLimitExceeded
    }

    /// Checks if the machine is in the configured halt state.
    pub fn is_halted(&self) -> bool {
        self.state == self.config.halt_state
    }

    /// Finds the transition the next step would apply, without applying it.
    pub fn find_rule(&self) -> Option<&'t Transition> {
        self.table.find_rule(&self.state, self.front_symbol())
    }

    /// Resets the machine to its initial configuration.
    pub fn reset(&mut self) {
        self.state = self.config.start_state.clone();
        self.tape = split_word(&self.word);
        self.history = vec![self.tape.iter().cloned().collect()];
        self.last_transition = None;
        self.step_count = 0;
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the symbol at the front of the tape, or the empty string if the tape is empty.
    pub fn front_symbol(&self) -> &str {
        self.tape.front().map_or("", String::as_str)
    }

    /// Returns the tape, front first.
    pub fn tape(&self) -> &VecDeque<String> {
        &self.tape
    }

    /// Returns the tape contents concatenated into a single string.
    pub fn tape_string(&self) -> String {
        self.tape.iter().map(String::as_str).collect()
    }

    /// Returns the most recently applied transition, if any step has been applied.
    pub fn last_transition(&self) -> Option<&Transition> {
        self.last_transition.as_ref()
    }

    /// Returns the tape snapshots recorded so far: the initial tape, then the tape after
    /// every applied step.
    pub fn history(&self) -> &[Vec<String>] {
        &self.history
    }

    /// Returns the number of applied steps.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the word the machine was created with.
    pub fn word(&self) -> &str {
        &self.word
    }
}

/// Splits a word into single-character tape symbols.
fn split_word(word: &str) -> VecDeque<String> {
    word.chars().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn tape_of<'a>(machine: &'a PostMachine<'_>) -> Vec<&'a str> {
        machine.tape().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_machine_creation() {
        let table = parse("<s><a><h>").unwrap();
        let machine = PostMachine::with_defaults("ab", &table);

        assert_eq!(machine.state(), "s");
        assert_eq!(tape_of(&machine), vec!["a", "b"]);
        assert_eq!(machine.front_symbol(), "a");
        assert_eq!(machine.step_count(), 0);
        assert!(machine.last_transition().is_none());
        assert_eq!(machine.history(), &[vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_empty_word_gives_empty_tape() {
        let table = TransitionTable::default();
        let machine = PostMachine::with_defaults("  ", &table);

        assert!(machine.tape().is_empty());
        assert_eq!(machine.front_symbol(), "");
    }

    #[test]
    fn test_read_step_consumes_front() {
        let table = parse("<s><a><q>").unwrap();
        let mut machine = PostMachine::with_defaults("ab", &table);

        assert_eq!(machine.step(), StepResult::Applied);
        assert_eq!(machine.state(), "q");
        assert_eq!(tape_of(&machine), vec!["b"]);
        assert_eq!(machine.front_symbol(), "b");
        assert_eq!(machine.last_transition(), Some(&Transition::read("s", "a", "q")));
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_write_step_appends_back() {
        let table = parse("<s><><q><#>").unwrap();
        let mut machine = PostMachine::with_defaults("ab", &table);

        assert_eq!(machine.step(), StepResult::Applied);
        assert_eq!(machine.state(), "q");
        assert_eq!(tape_of(&machine), vec!["a", "b", "#"]);
        assert_eq!(machine.front_symbol(), "a");
    }

    #[test]
    fn test_write_on_empty_tape_succeeds() {
        let table = parse("<s><><q><b>").unwrap();
        let mut machine = PostMachine::with_defaults("", &table);

        assert_eq!(machine.step(), StepResult::Applied);
        assert_eq!(tape_of(&machine), vec!["b"]);
        assert_eq!(machine.front_symbol(), "b");
    }

    #[test]
    fn test_read_on_empty_tape_fails() {
        let table = parse("<s><><q>").unwrap();
        let mut machine = PostMachine::with_defaults("", &table);

        assert_eq!(machine.step(), StepResult::ApplyFailed);
        assert_eq!(machine.state(), "s");
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.run(10), RunOutcome::Stuck(StuckReason::ApplyFailed));
    }

    #[test]
    fn test_no_rule_leaves_machine_unchanged() {
        let table = parse("<s><b><q>").unwrap();
        let mut machine = PostMachine::with_defaults("a", &table);

        assert_eq!(machine.step(), StepResult::NoRuleFound);
        assert_eq!(machine.state(), "s");
        assert_eq!(tape_of(&machine), vec!["a"]);
        assert!(machine.last_transition().is_none());
    }

    #[test]
    fn test_write_shadowing_drives_run() {
        // The write in state `s` is reached once the tape is empty and appends `b`.
        let table = parse("<s><a><s>\n<s><><q><b>\n<q><b><h>").unwrap();
        let mut machine = PostMachine::with_defaults("a", &table);

        assert_eq!(machine.step(), StepResult::Applied);
        assert_eq!(machine.state(), "s");
        assert!(machine.tape().is_empty());

        assert_eq!(machine.step(), StepResult::Applied);
        assert_eq!(machine.state(), "q");
        assert_eq!(tape_of(&machine), vec!["b"]);

        assert_eq!(machine.run(10), RunOutcome::Halted);
        assert_eq!(machine.state(), "h");
        assert!(machine.tape().is_empty());
        assert_eq!(machine.step_count(), 3);
    }

    #[test]
    fn test_run_stuck_without_start_rules() {
        let table = parse("<q><a><h>").unwrap();
        let mut machine = PostMachine::with_defaults("", &table);

        assert_eq!(machine.run(100), RunOutcome::Stuck(StuckReason::NoRuleFound));
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_run_step_limit() {
        let table = parse("<s><a><t>\n<t><><s><a>").unwrap();
        let mut machine = PostMachine::with_defaults("a", &table);

        assert_eq!(machine.run(100), RunOutcome::StepLimitExceeded);
        assert_eq!(machine.step_count(), 100);
        assert_eq!(machine.history().len(), 101);
        assert_eq!(machine.state(), "s");
        assert_eq!(tape_of(&machine), vec!["a"]);
    }

    #[test]
    fn test_run_zero_budget() {
        let table = parse("<s><a><h>").unwrap();
        let mut machine = PostMachine::with_defaults("a", &table);

        assert_eq!(machine.run(0), RunOutcome::StepLimitExceeded);
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_halt_on_last_allowed_step() {
        let table = parse("<s><a><h>").unwrap();
        let mut machine = PostMachine::with_defaults("a", &table);

        assert_eq!(machine.run(1), RunOutcome::Halted);
        assert!(machine.is_halted());
    }

    #[test]
    fn test_observer_skips_halting_step() {
        let table = parse("<s><a><s>\n<s><b><h>").unwrap();
        let mut machine = PostMachine::with_defaults("aab", &table);
        let mut seen = Vec::new();

        let outcome = machine.run_with_observer(10, |m| seen.push(m.tape_string()));

        assert_eq!(outcome, RunOutcome::Halted);
        assert_eq!(seen, vec!["ab", "b"]);
    }

    #[test]
    fn test_custom_state_names() {
        let table = parse("<start><a><accept>").unwrap();
        let config = MachineConfig::default()
            .with_start_state("start")
            .with_halt_state("accept");
        let mut machine = PostMachine::new("a", &table, config);

        assert_eq!(machine.state(), "start");
        assert_eq!(machine.run(5), RunOutcome::Halted);
    }

    #[test]
    fn test_run_to_completion_uses_config_budget() {
        let table = parse("<s><a><t>\n<t><><s><a>").unwrap();
        let config = MachineConfig::default().with_max_steps(7);
        let mut machine = PostMachine::new("a", &table, config);

        assert_eq!(machine.run_to_completion(), RunOutcome::StepLimitExceeded);
        assert_eq!(machine.step_count(), 7);
    }

    #[test]
    fn test_find_rule_peeks_without_applying() {
        let table = parse("<s><a><q>").unwrap();
        let machine = PostMachine::with_defaults("a", &table);

        assert_eq!(machine.find_rule(), Some(&Transition::read("s", "a", "q")));
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_reset() {
        let table = parse("<s><a><q>").unwrap();
        let mut machine = PostMachine::with_defaults("ab", &table);

        machine.step();
        machine.reset();

        assert_eq!(machine.state(), "s");
        assert_eq!(tape_of(&machine), vec!["a", "b"]);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.history().len(), 1);
        assert!(machine.last_transition().is_none());
    }

    #[test]
    fn test_history_tracks_every_applied_step() {
        let table = parse("<s><a><s>\n<s><><q><b>\n<q><b><h>").unwrap();
        let mut machine = PostMachine::with_defaults("a", &table);
        machine.run(10);

        let history: Vec<String> = machine.history().iter().map(|t| t.concat()).collect();
        assert_eq!(history, vec!["a", "", "b", ""]);
    }
}
