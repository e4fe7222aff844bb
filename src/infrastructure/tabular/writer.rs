// ============================================================
// OUTPUT WRITER
// ============================================================
// Serialise an annotated document next to its source file

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::domain::batch::{ExportFormat, OUTPUT_SUFFIX};
use crate::domain::error::{AppError, Result};
use crate::domain::tabular::{CellValue, TabularDocument};

/// `<dir>/<stem>_sentiment.<ext>` for the given source file
pub fn output_path_for(source: &Path, format: ExportFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    source.with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, format.extension()))
}

#[derive(Debug, Default)]
pub struct OutputWriter;

impl OutputWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(
        &self,
        document: &TabularDocument,
        source: &Path,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let out_path = output_path_for(source, format);

        match format {
            ExportFormat::Csv => write_csv(document, &out_path)?,
            ExportFormat::Xlsx => write_xlsx(document, &out_path)?,
        }

        info!(
            path = %out_path.display(),
            format = format.extension(),
            rows = document.row_count(),
            "Wrote output file"
        );
        Ok(out_path)
    }
}

fn write_csv(document: &TabularDocument, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::WriteError(e.to_string()))?;

    writer
        .write_record(document.column_names())
        .map_err(|e| AppError::WriteError(e.to_string()))?;

    for row in document.rows() {
        let record: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        writer
            .write_record(&record)
            .map_err(|e| AppError::WriteError(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::WriteError(e.to_string()))
}

fn write_xlsx(document: &TabularDocument, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    fill_sheet(sheet, document).map_err(|e| AppError::WriteError(e.to_string()))?;

    workbook
        .save(path)
        .map_err(|e| AppError::WriteError(e.to_string()))
}

fn fill_sheet(
    sheet: &mut Worksheet,
    document: &TabularDocument,
) -> std::result::Result<(), XlsxError> {
    for (col_idx, column) in document.columns().iter().enumerate() {
        let col = u16::try_from(col_idx)
            .map_err(|_| XlsxError::ParameterError("too many columns".to_string()))?;
        sheet.write_string(0, col, column.name.as_str())?;

        for (row_idx, cell) in column.values.iter().enumerate() {
            let row = u32::try_from(row_idx + 1)
                .map_err(|_| XlsxError::ParameterError("too many rows".to_string()))?;
            match cell {
                CellValue::Null => {}
                CellValue::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                CellValue::Int(i) => {
                    sheet.write_number(row, col, *i as f64)?;
                }
                CellValue::Float(f) => {
                    sheet.write_number(row, col, *f)?;
                }
                CellValue::Text(s) => {
                    sheet.write_string(row, col, s.as_str())?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated() -> TabularDocument {
        TabularDocument::from_rows(
            vec!["text".to_string(), "SentimentScore".to_string()],
            vec![
                vec!["fine, \"quoted\"".into(), CellValue::Float(0.75)],
                vec![CellValue::Null, CellValue::Float(1.0)],
            ],
        )
    }

    #[test]
    fn test_output_path_derivation() {
        let src = Path::new("/data/uploads/reviews.csv");
        assert_eq!(
            output_path_for(src, ExportFormat::Xlsx),
            PathBuf::from("/data/uploads/reviews_sentiment.xlsx")
        );
        assert_eq!(
            output_path_for(src, ExportFormat::Csv),
            PathBuf::from("/data/uploads/reviews_sentiment.csv")
        );
    }

    #[test]
    fn test_write_csv_content() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.xlsx");

        let out = OutputWriter::new()
            .write(&annotated(), &src, ExportFormat::Csv)
            .unwrap();
        assert_eq!(out, dir.path().join("in_sentiment.csv"));

        let written = std::fs::read_to_string(out).unwrap();
        assert_eq!(
            written,
            "text,SentimentScore\n\"fine, \"\"quoted\"\"\",0.75\n,1.0\n"
        );
    }

    #[test]
    fn test_write_xlsx_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.csv");

        let out = OutputWriter::new()
            .write(&annotated(), &src, ExportFormat::Xlsx)
            .unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_unwritable_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("missing").join("in.csv");

        let err = OutputWriter::new()
            .write(&annotated(), &src, ExportFormat::Csv)
            .unwrap_err();
        assert!(matches!(err, AppError::WriteError(_)));
    }
}
