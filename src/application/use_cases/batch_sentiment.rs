// ============================================================
// BATCH SENTIMENT USE CASE
// ============================================================
// Load an upload, score one column, append results, write output

use std::time::Instant;

use tracing::info;

use super::batch_orchestrator::BatchOrchestrator;
use super::column_resolver::ColumnResolver;
use super::sentiment_model::SentimentModel;
use crate::domain::batch::{
    BatchRequest, BatchResult, EXPLANATION_COLUMN, LABEL_COLUMN, SCORE_COLUMN,
};
use crate::domain::error::{AppError, Result};
use crate::domain::sentiment::ClassificationRecord;
use crate::domain::tabular::{CellValue, TabularDocument};
use crate::infrastructure::config::BatchSettings;
use crate::infrastructure::tabular::{OutputWriter, TabularLoader};

pub struct BatchSentimentUseCase {
    loader: TabularLoader,
    resolver: ColumnResolver,
    orchestrator: BatchOrchestrator,
    writer: OutputWriter,
    max_preview_rows: usize,
}

impl BatchSentimentUseCase {
    pub fn new(settings: &BatchSettings, model: SentimentModel) -> Result<Self> {
        Ok(Self {
            loader: TabularLoader::new(settings.encodings()?),
            resolver: ColumnResolver::new(settings.case_insensitive_columns),
            orchestrator: BatchOrchestrator::new(model, settings.chunk_size()),
            writer: OutputWriter::new(),
            max_preview_rows: settings.max_preview_rows,
        })
    }

    pub fn process_file(&self, request: &BatchRequest) -> Result<BatchResult> {
        let start = Instant::now();

        let source = request
            .file_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| AppError::InputMissing("Please upload a file first.".to_string()))?;
        if request.text_column.trim().is_empty() {
            return Err(AppError::InputMissing(
                "Please enter the column name that contains the text.".to_string(),
            ));
        }

        let mut document = self.loader.load(source)?;
        let actual_column = self.resolver.resolve(&document, &request.text_column)?;

        info!(
            requested = %request.text_column,
            column = %actual_column,
            rows = document.row_count(),
            "Resolved text column"
        );

        let records = self.orchestrator.process(&document, &actual_column)?;
        append_results(&mut document, &records)?;

        let output_path = self.writer.write(&document, source, request.export_as)?;
        let preview = document.head(self.max_preview_rows);

        info!(
            source = %source.display(),
            output = %output_path.display(),
            rows = document.row_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch sentiment finished"
        );

        Ok(BatchResult {
            output_path,
            preview,
        })
    }
}

/// Label, score and explanation columns, in that order. Existing columns with
/// the same names are overwritten in place.
pub fn append_results(
    document: &mut TabularDocument,
    records: &[ClassificationRecord],
) -> Result<()> {
    let labels = records
        .iter()
        .map(|r| CellValue::from(r.label.as_str()))
        .collect();
    let scores = records.iter().map(|r| CellValue::Float(r.score)).collect();
    let explanations = records
        .iter()
        .map(|r| CellValue::Text(r.explanation.clone()))
        .collect();

    document.set_column(LABEL_COLUMN, labels)?;
    document.set_column(SCORE_COLUMN, scores)?;
    document.set_column(EXPLANATION_COLUMN, explanations)?;
    Ok(())
}
