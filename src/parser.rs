//! This module provides the parser for Post Machine transition tables, utilizing the `pest` crate.
//! It defines the grammar for table sources and turns them into a `TransitionTable`.

use crate::{
    table::TransitionTable,
    types::{PostMachineError, Transition, MAX_TABLE_SIZE},
};
use pest::{
    iterators::{Pair, Pairs},
    Parser as PestParser,
};
use pest_derive::Parser as PestParser;
use tracing::debug;

/// Derives a `PestParser` for the transition table grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct PostTableParser;

/// Parses the given table source into a `TransitionTable`.
///
/// Each rule line is turned into a read transition (three fields) or a write transition
/// (four fields). Parsing is all-or-nothing: the first bad line aborts the whole table.
///
/// # Arguments
///
/// * `input` - A string slice containing the table source.
///
/// # Returns
///
/// * `Ok(TransitionTable)` with the transitions in source order.
/// * `Err(PostMachineError::ParseError)` if a line is not a sequence of `<...>` fields.
/// * `Err(PostMachineError::TableFormat)` if a rule line has an unsupported number of fields.
/// * `Err(PostMachineError::ValidationError)` if the source exceeds `MAX_TABLE_SIZE`.
pub fn parse(input: &str) -> Result<TransitionTable, PostMachineError> {
    if input.len() > MAX_TABLE_SIZE {
        return Err(PostMachineError::ValidationError(format!(
            "Table source is {} bytes, the limit is {} bytes",
            input.len(),
            MAX_TABLE_SIZE
        )));
    }

    let root = PostTableParser::parse(Rule::table, input)
        .map_err(|e| PostMachineError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| PostMachineError::ValidationError("Empty parse tree".to_string()))?;

    let transitions = root
        .into_inner()
        .filter(|p| p.as_rule() == Rule::rule)
        .map(parse_transition)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(transitions = transitions.len(), "parsed transition table");

    Ok(TransitionTable::new(transitions))
}

/// Builds a transition from a `Pair<Rule::rule>`.
///
/// The command is decided here, once, from the number of fields.
fn parse_transition(pair: Pair<Rule>) -> Result<Transition, PostMachineError> {
    let (line, _) = pair.as_span().start_pos().line_col();
    let text = pair.as_str().trim().to_string();
    let fields = parse_fields(pair.into_inner());

    match fields.as_slice() {
        [state, symbol, next] => Ok(Transition::read(state, symbol, next)),
        [state, declared, next, symbol] => Ok(Transition::write(state, declared, next, symbol)),
        _ => Err(PostMachineError::TableFormat { line, text }),
    }
}

/// Collects the raw field contents of a rule.
fn parse_fields(pairs: Pairs<'_, Rule>) -> Vec<&str> {
    pairs
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| p.as_str())
        .collect()
}
