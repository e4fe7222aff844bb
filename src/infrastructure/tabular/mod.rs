// ============================================================
// TABULAR INFRASTRUCTURE LAYER
// ============================================================
// Loading uploads into a TabularDocument and writing annotated output

pub mod encoding;

mod csv_loader;
mod excel_loader;
mod writer;

pub use csv_loader::CsvLoader;
pub use excel_loader::{ExcelEngine, ExcelLoader};
pub use writer::{output_path_for, OutputWriter};

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::tabular::TabularDocument;
use encoding::CsvEncoding;

/// Cell strings that load as missing values
pub(crate) const MISSING_VALUE_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub(crate) fn is_missing_marker(value: &str) -> bool {
    MISSING_VALUE_MARKERS.contains(&value)
}

/// Blank headers become `Unnamed: <idx>`, repeated headers get `.1`, `.2`, ...
pub(crate) fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (idx, name) in raw.iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name.clone()
        };

        let mut candidate = base.clone();
        while taken.contains(&candidate) {
            let counter = counters.entry(base.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{}.{}", base, counter);
        }

        taken.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}

/// Dispatches uploads to the CSV or spreadsheet reader by file extension
pub struct TabularLoader {
    csv: CsvLoader,
}

impl TabularLoader {
    pub fn new(encodings: Vec<CsvEncoding>) -> Self {
        Self {
            csv: CsvLoader::new(encodings),
        }
    }

    /// Load a file; fails with `LoadError` on read problems and `EmptyDataset` on zero rows
    pub fn load(&self, path: &Path) -> Result<TabularDocument> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let document = match ext.as_str() {
            "csv" => self.csv.load(path)?,
            "xlsx" => ExcelLoader::new(ExcelEngine::Xlsx).load(path)?,
            "xls" => ExcelLoader::new(ExcelEngine::Xls).load(path)?,
            _ => {
                return Err(AppError::LoadError(
                    "Unsupported file type. Please upload .csv, .xlsx, or .xls".to_string(),
                ))
            }
        };

        info!(
            path = %path.display(),
            rows = document.row_count(),
            columns = document.columns().len(),
            "Loaded tabular file"
        );

        if document.is_empty() {
            return Err(AppError::EmptyDataset(
                "The uploaded file has no rows.".to_string(),
            ));
        }

        Ok(document)
    }
}

impl Default for TabularLoader {
    fn default() -> Self {
        Self::new(CsvEncoding::defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_normalize_headers() {
        let raw = vec![
            "id".to_string(),
            "".to_string(),
            "id".to_string(),
            "id".to_string(),
            "id.1".to_string(),
        ];
        assert_eq!(
            normalize_headers(&raw),
            vec!["id", "Unnamed: 1", "id.1", "id.2", "id.1.1"]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "text\nhello").unwrap();

        let err = TabularLoader::default().load(&path).unwrap_err();
        assert!(matches!(err, AppError::LoadError(_)));
        assert!(err.to_string().contains(".csv, .xlsx, or .xls"));
    }

    #[test]
    fn test_header_only_file_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "id,text\n").unwrap();

        let err = TabularLoader::default().load(&path).unwrap_err();
        assert!(matches!(err, AppError::EmptyDataset(_)));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UPPER.CSV");
        fs::write(&path, "text\nhello\n").unwrap();

        let doc = TabularLoader::default().load(&path).unwrap();
        assert_eq!(doc.row_count(), 1);
    }
}
