use crate::table::TransitionTable;
use crate::types::PostMachineError;

use std::sync::RwLock;
use tracing::warn;

// Embedded tables as (name, source)
const TABLE_TEXTS: [(&str, &str); 3] = [
    ("anbncn", include_str!("../tables/anbncn.post")),
    ("anbn", include_str!("../tables/anbn.post")),
    ("even-a", include_str!("../tables/even-a.post")),
];

lazy_static::lazy_static! {
    pub static ref TABLES: RwLock<Vec<(String, TransitionTable)>> = RwLock::new(Vec::new());
}

pub struct TableManager;

impl TableManager {
    /// Parses the embedded tables into the registry.
    pub fn load() -> Result<(), PostMachineError> {
        let mut tables = Vec::new();

        for (name, text) in TABLE_TEXTS {
            match crate::parser::parse(text) {
                Ok(table) => tables.push((name.to_string(), table)),
                Err(e) => warn!(table = name, error = %e, "failed to parse built-in table"),
            }
        }

        if let Ok(mut write_guard) = TABLES.write() {
            *write_guard = tables;
        } else {
            return Err(PostMachineError::ValidationError(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    fn ensure_loaded() {
        let empty = TABLES.read().map(|tables| tables.is_empty()).unwrap_or(true);
        if empty {
            let _ = Self::load();
        }
    }

    /// Get the number of available tables
    pub fn get_table_count() -> usize {
        Self::ensure_loaded();

        TABLES.read().map(|tables| tables.len()).unwrap_or(0)
    }

    /// Get a table by its index
    pub fn get_table_by_index(index: usize) -> Result<TransitionTable, PostMachineError> {
        Self::ensure_loaded();

        TABLES
            .read()
            .map_err(|_| PostMachineError::ValidationError("Failed to acquire read lock".to_string()))?
            .get(index)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| {
                PostMachineError::ValidationError(format!("Table index {} out of range", index))
            })
    }

    /// Get a table by its name
    pub fn get_table_by_name(name: &str) -> Result<TransitionTable, PostMachineError> {
        Self::ensure_loaded();

        TABLES
            .read()
            .map_err(|_| PostMachineError::ValidationError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|(table_name, _)| table_name == name)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| PostMachineError::ValidationError(format!("Table '{}' not found", name)))
    }

    /// List all table names
    pub fn list_table_names() -> Vec<String> {
        Self::ensure_loaded();

        TABLES
            .read()
            .map(|tables| tables.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get the source text of a table by its name
    pub fn get_table_text(name: &str) -> Result<&'static str, PostMachineError> {
        TABLE_TEXTS
            .iter()
            .find(|(table_name, _)| *table_name == name)
            .map(|(_, text)| *text)
            .ok_or_else(|| PostMachineError::ValidationError(format!("Table '{}' not found", name)))
    }

    /// Get information about a table by its index
    pub fn get_table_info(index: usize) -> Result<TableInfo, PostMachineError> {
        let table = Self::get_table_by_index(index)?;
        let name = Self::list_table_names()
            .get(index)
            .cloned()
            .unwrap_or_default();

        Ok(TableInfo {
            index,
            name,
            state_count: table.states().len(),
            transition_count: table.len(),
            write_count: table.iter().filter(|t| t.is_write()).count(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TableInfo {
    pub index: usize,
    pub name: String,
    pub state_count: usize,
    pub transition_count: usize,
    pub write_count: usize,
}
