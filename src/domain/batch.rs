use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::tabular::TablePreview;

pub const LABEL_COLUMN: &str = "SentimentLabel";
pub const SCORE_COLUMN: &str = "SentimentScore";
pub const EXPLANATION_COLUMN: &str = "SentimentExplanation";

/// Appended to the input file stem to name the output file
pub const OUTPUT_SUFFIX: &str = "_sentiment";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    Xlsx,
}

impl ExportFormat {
    /// `"csv"` selects CSV; every other value falls back to xlsx.
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim().eq_ignore_ascii_case("csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Xlsx
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub file_path: Option<PathBuf>,
    pub text_column: String,
    pub export_as: ExportFormat,
}

impl BatchRequest {
    pub fn new(
        file_path: impl Into<PathBuf>,
        text_column: impl Into<String>,
        export_as: ExportFormat,
    ) -> Self {
        Self {
            file_path: Some(file_path.into()),
            text_column: text_column.into(),
            export_as,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub output_path: PathBuf,
    pub preview: TablePreview,
}
