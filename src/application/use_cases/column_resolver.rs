use std::collections::HashMap;

use crate::domain::error::{AppError, Result};
use crate::domain::tabular::TabularDocument;

/// Maps a user supplied column name onto a column of the loaded table
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver {
    case_insensitive: bool,
}

impl ColumnResolver {
    pub fn new(case_insensitive: bool) -> Self {
        Self { case_insensitive }
    }

    /// Exact match first, then (when enabled) a trimmed case-insensitive match.
    /// When several columns fold to the same key the leftmost one wins.
    pub fn resolve(&self, document: &TabularDocument, requested: &str) -> Result<String> {
        if requested.trim().is_empty() {
            return Err(AppError::InputMissing(
                "Please enter the column name that contains the text.".to_string(),
            ));
        }

        if let Some(column) = document.column(requested) {
            return Ok(column.name.clone());
        }

        if self.case_insensitive {
            let mut lower_map: HashMap<String, &str> = HashMap::new();
            for column in document.columns() {
                lower_map
                    .entry(column.name.to_lowercase())
                    .or_insert(column.name.as_str());
            }

            let key = requested.trim().to_lowercase();
            if let Some(actual) = lower_map.get(&key) {
                return Ok(actual.to_string());
            }
        }

        Err(AppError::ColumnNotFound {
            requested: requested.to_string(),
            available: document.column_names(),
        })
    }
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new(true)
    }
}
