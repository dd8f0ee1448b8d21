//! This module provides the `TableLoader` struct, responsible for loading Post Machine
//! transition tables from files, strings, and directories.

use crate::parser::parse;
use crate::table::TransitionTable;
use crate::types::PostMachineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of transition table sources.
pub const TABLE_EXTENSION: &str = "post";

/// A table identified by `K` (a path or a name), or the error that prevented loading it.
pub type TableEntry<K> = (K, Result<TransitionTable, PostMachineError>);

/// `TableLoader` is a utility struct for loading transition tables.
/// It provides methods to load tables from individual files, from string content,
/// and to discover and load all `.post` files within a specified directory.
pub struct TableLoader;

impl TableLoader {
    /// Loads a single transition table from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the table file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if the file is successfully read and parsed.
    /// * `Err(PostMachineError::TableSourceUnavailable)` if the file cannot be read.
    /// * `Err(PostMachineError::TableFormat)` or `Err(PostMachineError::ParseError)` if the
    ///   file content is not a valid table.
    pub fn load_table(path: &Path) -> Result<TransitionTable, PostMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            PostMachineError::TableSourceUnavailable(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), "loading transition table");

        parse(&content)
    }

    /// Loads a single transition table from the provided string content.
    pub fn load_table_from_string(content: &str) -> Result<TransitionTable, PostMachineError> {
        parse(content)
    }

    /// Loads every `.post` table in `directory`, sorted by path.
    ///
    /// An unreadable directory is an error. A table that fails to load is reported next to
    /// its path, so one bad table does not hide the others.
    pub fn load_tables(directory: &Path) -> Result<Vec<TableEntry<PathBuf>>, PostMachineError> {
        let entries = fs::read_dir(directory).map_err(|e| {
            PostMachineError::TableSourceUnavailable(format!(
                "Failed to read directory {}: {}",
                directory.display(),
                e
            ))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_table_file(path))
            .collect();
        paths.sort();

        debug!(directory = %directory.display(), tables = paths.len(), "loading table directory");

        Ok(paths
            .into_iter()
            .map(|path| {
                let table = Self::load_table(&path);
                (path, table)
            })
            .collect())
    }

    /// Loads the table at `path`, or every table in it when `path` is a directory.
    ///
    /// Entries are named after their files. A single file must load; a directory must hold
    /// at least one table, though individual tables in it may fail.
    pub fn load_path(path: &Path) -> Result<Vec<TableEntry<String>>, PostMachineError> {
        if !path.is_dir() {
            let table = Self::load_table(path)?;
            return Ok(vec![(Self::table_name(path), Ok(table))]);
        }

        let entries = Self::load_tables(path)?;
        if entries.is_empty() {
            return Err(PostMachineError::TableSourceUnavailable(format!(
                "No .{} tables in {}",
                TABLE_EXTENSION,
                path.display()
            )));
        }

        Ok(entries
            .into_iter()
            .map(|(table_path, table)| (Self::table_name(&table_path), table))
            .collect())
    }

    /// Returns the name a table is known by: its file name without extension.
    pub fn table_name(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "table".to_string())
    }
}

fn is_table_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == TABLE_EXTENSION)
}
