// ============================================================
// EXCEL LOADER
// ============================================================
// Read the first worksheet of an .xlsx / .xls upload

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, Data, DataType, Range, Reader, Xls, Xlsx};

use super::{is_missing_marker, normalize_headers};
use crate::domain::error::{AppError, Result};
use crate::domain::tabular::{CellValue, TabularDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcelEngine {
    /// Office Open XML workbooks
    Xlsx,
    /// Legacy binary workbooks
    Xls,
}

pub struct ExcelLoader {
    engine: ExcelEngine,
}

impl ExcelLoader {
    pub fn new(engine: ExcelEngine) -> Self {
        Self { engine }
    }

    pub fn load(&self, path: &Path) -> Result<TabularDocument> {
        let range = match self.engine {
            ExcelEngine::Xlsx => first_sheet::<Xlsx<BufReader<File>>>(path)?,
            ExcelEngine::Xls => first_sheet::<Xls<BufReader<File>>>(path)?,
        };
        Ok(document_from_range(&range))
    }
}

fn first_sheet<R>(path: &Path) -> Result<Range<Data>>
where
    R: Reader<BufReader<File>>,
    R::Error: fmt::Display,
{
    let mut workbook: R = open_workbook(path)
        .map_err(|e| AppError::LoadError(format!("Failed to open Excel file: {}", e)))?;

    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::LoadError("No worksheet found".to_string()))?
        .map_err(|e| AppError::LoadError(format!("Failed to read Excel range: {}", e)))
}

/// First row is the header row; every following row is data
fn document_from_range(range: &Range<Data>) -> TabularDocument {
    let mut rows = range.rows();

    let raw_headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return TabularDocument::default(),
    };
    let headers = normalize_headers(&raw_headers);

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    TabularDocument::from_rows(headers, data)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other
            .as_string()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("{}", other)),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if is_missing_marker(s) => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(format!("{}", other)),
    }
}
