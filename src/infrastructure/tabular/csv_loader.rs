// ============================================================
// CSV LOADER
// ============================================================
// Read CSV uploads with an ordered encoding fallback

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

use super::encoding::CsvEncoding;
use super::{is_missing_marker, normalize_headers};
use crate::domain::error::{AppError, Result};
use crate::domain::tabular::{CellValue, Column, TabularDocument};

pub struct CsvLoader {
    /// Tried in order; the first one that parses wins
    encodings: Vec<CsvEncoding>,
}

impl CsvLoader {
    pub fn new(encodings: Vec<CsvEncoding>) -> Self {
        Self { encodings }
    }

    pub fn load(&self, path: &Path) -> Result<TabularDocument> {
        let bytes = std::fs::read(path)
            .map_err(|e| AppError::LoadError(format!("Failed to read {}: {}", path.display(), e)))?;
        self.load_bytes(&bytes)
    }

    pub fn load_bytes(&self, bytes: &[u8]) -> Result<TabularDocument> {
        let mut last_error: Option<String> = None;

        for encoding in &self.encodings {
            let content = encoding.decode_lossy(bytes);
            match self.parse_content(&content) {
                Ok(document) => {
                    debug!(encoding = encoding.label(), "Parsed CSV");
                    return Ok(document);
                }
                Err(err) => {
                    warn!(encoding = encoding.label(), error = %err, "CSV parse attempt failed");
                    last_error = Some(err);
                }
            }
        }

        Err(AppError::LoadError(format!(
            "Could not read CSV file: {}",
            last_error.unwrap_or_else(|| "no encodings configured".to_string())
        )))
    }

    /// Parse decoded CSV text. Errors are plain messages so the caller can try the next encoding.
    pub fn parse_content(&self, content: &str) -> std::result::Result<TabularDocument, String> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::None)
            .flexible(true)
            .from_reader(content.as_bytes());

        let raw_headers: Vec<String> = reader
            .headers()
            .map_err(|e| format!("Failed to read CSV headers: {}", e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if raw_headers.is_empty() {
            return Err("No columns to parse from file".to_string());
        }
        let headers = normalize_headers(&raw_headers);

        let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for (index, result) in reader.records().enumerate() {
            let record =
                result.map_err(|e| format!("Failed to parse CSV row {}: {}", index + 1, e))?;

            if record.len() > headers.len() {
                return Err(format!(
                    "Expected {} fields in row {}, saw {}",
                    headers.len(),
                    index + 1,
                    record.len()
                ));
            }

            for (idx, column) in raw_columns.iter_mut().enumerate() {
                let value = record
                    .get(idx)
                    .filter(|v| !is_missing_marker(v))
                    .map(|v| v.to_string());
                column.push(value);
            }
        }

        let columns = headers
            .into_iter()
            .zip(raw_columns)
            .map(|(name, values)| Column {
                name,
                values: infer_column(values),
            })
            .collect();

        TabularDocument::from_columns(columns).map_err(|e| e.to_string())
    }
}

/// Type a column of raw strings: integers, then floats, then booleans, else text
fn infer_column(values: Vec<Option<String>>) -> Vec<CellValue> {
    let present: Vec<&str> = values.iter().flatten().map(|v| v.trim()).collect();

    if present.is_empty() {
        return values.iter().map(|_| CellValue::Null).collect();
    }

    if present.iter().all(|v| v.parse::<i64>().is_ok()) {
        return map_cells(values, |v| v.trim().parse::<i64>().ok().map(CellValue::Int));
    }
    if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        return map_cells(values, |v| v.trim().parse::<f64>().ok().map(CellValue::Float));
    }
    if present.iter().all(|v| parse_bool(v).is_some()) {
        return map_cells(values, |v| parse_bool(v.trim()).map(CellValue::Bool));
    }

    values
        .into_iter()
        .map(|v| v.map(CellValue::Text).unwrap_or(CellValue::Null))
        .collect()
}

fn map_cells<F>(values: Vec<Option<String>>, convert: F) -> Vec<CellValue>
where
    F: Fn(&str) -> Option<CellValue>,
{
    values
        .iter()
        .map(|v| v.as_deref().and_then(&convert).unwrap_or(CellValue::Null))
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}
