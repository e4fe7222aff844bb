// ============================================================
// TABULAR DOCUMENT
// ============================================================
// Ordered named columns aligned by row index

use serde::{Deserialize, Serialize};

use super::CellValue;
use crate::domain::error::{AppError, Result};

/// A named column of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

/// A loaded table. Columns are only ever appended or overwritten in place,
/// never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularDocument {
    columns: Vec<Column>,
    row_count: usize,
}

/// First rows of a document, for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,

    /// Row count of the full document the preview was cut from
    pub total_rows: usize,
}

impl TabularDocument {
    /// Build a document from a header row and data rows.
    /// Short rows are padded with `Null`; cells beyond the header are dropped.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let row_count = rows.len();
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(row_count),
            })
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or(CellValue::Null));
            }
        }

        Self { columns, row_count }
    }

    /// Build a document from already aligned columns
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != row_count) {
            return Err(AppError::Validation(format!(
                "Column '{}' has {} values, expected {}",
                bad.name,
                bad.values.len(),
                row_count
            )));
        }
        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Append a column, or replace the values of an existing column with the same name
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) -> Result<()> {
        if !self.columns.is_empty() && values.len() != self.row_count {
            return Err(AppError::Validation(format!(
                "Column '{}' has {} values, expected {}",
                name,
                values.len(),
                self.row_count
            )));
        }
        if self.columns.is_empty() {
            self.row_count = values.len();
        }

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }

    /// Row `index` as a list of cells in column order
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&CellValue>> + '_ {
        (0..self.row_count).filter_map(move |idx| self.row(idx))
    }

    pub fn head(&self, limit: usize) -> TablePreview {
        let rows = self
            .rows()
            .take(limit)
            .map(|row| row.into_iter().cloned().collect())
            .collect();

        TablePreview {
            columns: self.column_names(),
            rows,
            total_rows: self.row_count,
        }
    }
}
