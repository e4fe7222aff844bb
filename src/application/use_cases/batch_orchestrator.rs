use tracing::{debug, info};

use super::result_normalizer::normalize_all;
use super::sentiment_model::SentimentModel;
use crate::domain::error::{AppError, Result};
use crate::domain::sentiment::ClassificationRecord;
use crate::domain::tabular::TabularDocument;

/// Runs one column of a table through the model in bounded chunks
pub struct BatchOrchestrator {
    model: SentimentModel,

    /// `None` sends the whole column in one call
    chunk_size: Option<usize>,
}

impl BatchOrchestrator {
    pub fn new(model: SentimentModel, chunk_size: Option<usize>) -> Self {
        Self {
            model,
            chunk_size: chunk_size.filter(|size| *size > 0),
        }
    }

    /// One record per row, in row order. Any backend failure aborts the whole batch.
    pub fn process(
        &self,
        document: &TabularDocument,
        text_column: &str,
    ) -> Result<Vec<ClassificationRecord>> {
        let column = document.column(text_column).ok_or_else(|| AppError::ColumnNotFound {
            requested: text_column.to_string(),
            available: document.column_names(),
        })?;

        if column.values.iter().all(|v| v.is_null()) {
            return Err(AppError::EmptyColumn(column.name.clone()));
        }

        let texts: Vec<String> = column.values.iter().map(|v| v.as_text()).collect();
        let records = self.classify_texts(&texts)?;

        if records.len() != texts.len() {
            return Err(AppError::ResultCountMismatch {
                expected: texts.len(),
                actual: records.len(),
            });
        }

        info!(
            column = %column.name,
            rows = records.len(),
            backend = self.model.backend_name(),
            "Batch classification complete"
        );
        Ok(records)
    }

    pub fn classify_texts(&self, texts: &[String]) -> Result<Vec<ClassificationRecord>> {
        match self.chunk_size {
            Some(size) if texts.len() > size => {
                let mut records = Vec::with_capacity(texts.len());
                let total_chunks = texts.len().div_ceil(size);
                for (idx, chunk) in texts.chunks(size).enumerate() {
                    debug!(chunk = idx + 1, total_chunks, size = chunk.len(), "Classifying chunk");
                    records.extend(self.classify_chunk(chunk)?);
                }
                Ok(records)
            }
            _ => self.classify_chunk(texts),
        }
    }

    /// One backend call; the reply must line up with `texts` one to one
    fn classify_chunk(&self, texts: &[String]) -> Result<Vec<ClassificationRecord>> {
        let raw = self.model.analyze_bulk(texts).map_err(wrap_backend_error)?;
        if raw.len() != texts.len() {
            return Err(AppError::ResultCountMismatch {
                expected: texts.len(),
                actual: raw.len(),
            });
        }
        Ok(normalize_all(&raw))
    }
}

fn wrap_backend_error(err: AppError) -> AppError {
    match err {
        AppError::BackendFailure(_) => err,
        other => AppError::BackendFailure(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::FakeBackend;
    use crate::domain::sentiment::SentimentLabel;
    use crate::domain::tabular::CellValue;
    use std::sync::Arc;

    fn text_doc(values: Vec<CellValue>) -> TabularDocument {
        let rows = values.into_iter().map(|v| vec![v]).collect();
        TabularDocument::from_rows(vec!["text".to_string()], rows)
    }

    fn orchestrator(backend: Arc<FakeBackend>, chunk_size: Option<usize>) -> BatchOrchestrator {
        BatchOrchestrator::new(SentimentModel::new(backend), chunk_size)
    }

    #[test]
    fn test_scenario_a_three_rows_chunk_two() {
        let backend = Arc::new(FakeBackend::new());
        let doc = text_doc(vec![
            "I love this!".into(),
            "This is terrible.".into(),
            "".into(),
        ]);

        let records = orchestrator(backend.clone(), Some(2)).process(&doc, "text").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].label, SentimentLabel::Positive);
        assert_eq!(records[1].label, SentimentLabel::Negative);
        assert_eq!(records[2].label, SentimentLabel::Neutral);
        assert_eq!(backend.calls(), vec![2, 1]);
    }

    #[test]
    fn test_scenario_c_chunk_sizes_and_order() {
        let backend = Arc::new(FakeBackend::new());
        let values: Vec<CellValue> = (0..2500)
            .map(|i| {
                if i % 3 == 0 {
                    CellValue::from(format!("row {i} love"))
                } else {
                    CellValue::from(format!("row {i}"))
                }
            })
            .collect();
        let doc = text_doc(values);

        let records = orchestrator(backend.clone(), Some(1000)).process(&doc, "text").unwrap();
        assert_eq!(backend.calls(), vec![1000, 1000, 500]);
        assert_eq!(records.len(), 2500);
        for (i, record) in records.iter().enumerate() {
            let expected = if i % 3 == 0 {
                SentimentLabel::Positive
            } else {
                SentimentLabel::Neutral
            };
            assert_eq!(record.label, expected, "row {i}");
        }

        let seen = backend.seen_texts();
        assert_eq!(seen[0], "row 0 love");
        assert_eq!(seen[2498], "row 2498");
        assert_eq!(seen[2499], "row 2499 love");
    }

    #[test]
    fn test_chunked_equals_unchunked() {
        let values: Vec<CellValue> = vec![
            "great".into(),
            "meh".into(),
            CellValue::Null,
            "hate it".into(),
            CellValue::Int(4),
            "love".into(),
            "terrible".into(),
        ];
        let doc = text_doc(values);

        let chunked = orchestrator(Arc::new(FakeBackend::new()), Some(3))
            .process(&doc, "text")
            .unwrap();
        let whole = orchestrator(Arc::new(FakeBackend::new()), None)
            .process(&doc, "text")
            .unwrap();
        assert_eq!(chunked, whole);
    }

    #[test]
    fn test_unchunked_when_within_limit_or_disabled() {
        let doc = text_doc(vec!["a".into(), "b".into(), "c".into()]);

        let backend = Arc::new(FakeBackend::new());
        orchestrator(backend.clone(), Some(3)).process(&doc, "text").unwrap();
        assert_eq!(backend.calls(), vec![3]);

        let backend = Arc::new(FakeBackend::new());
        orchestrator(backend.clone(), Some(0)).process(&doc, "text").unwrap();
        assert_eq!(backend.calls(), vec![3]);

        let backend = Arc::new(FakeBackend::new());
        orchestrator(backend.clone(), None).process(&doc, "text").unwrap();
        assert_eq!(backend.calls(), vec![3]);
    }

    #[test]
    fn test_nulls_become_empty_strings_in_place() {
        let backend = Arc::new(FakeBackend::new());
        let doc = text_doc(vec!["love".into(), CellValue::Null, CellValue::Int(7)]);

        orchestrator(backend.clone(), None).process(&doc, "text").unwrap();
        assert_eq!(
            backend.seen_texts(),
            vec!["love".to_string(), String::new(), "7".to_string()]
        );
    }

    #[test]
    fn test_all_null_column_fails_before_inference() {
        let backend = Arc::new(FakeBackend::new());
        let doc = text_doc(vec![CellValue::Null, CellValue::Null]);

        let err = orchestrator(backend.clone(), Some(1)).process(&doc, "text").unwrap_err();
        assert!(matches!(err, AppError::EmptyColumn(ref c) if c == "text"));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_backend_failure_aborts_batch() {
        let backend = Arc::new(FakeBackend::failing_on(2));
        let doc = text_doc(vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()]);

        let err = orchestrator(backend.clone(), Some(2)).process(&doc, "text").unwrap_err();
        assert!(matches!(err, AppError::BackendFailure(_)));
        assert_eq!(err.to_string(), "Sentiment analysis failed: model crashed");
        // the third chunk is never attempted
        assert_eq!(backend.calls(), vec![2, 2]);
    }

    #[test]
    fn test_dropped_results_are_a_mismatch() {
        let backend = Arc::new(FakeBackend::dropping_last());
        let doc = text_doc(vec!["a".into(), "b".into(), "c".into()]);

        let err = orchestrator(backend, None).process(&doc, "text").unwrap_err();
        match err {
            AppError::ResultCountMismatch { expected, actual } => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_per_chunk_miscount_is_caught_even_when_totals_match() {
        // call 1 loses its first entry, call 2 repeats one, so the total still matches
        let backend = Arc::new(FakeBackend::misaligning());
        let doc = text_doc(vec!["love".into(), "hate".into(), "hate".into(), "love".into()]);

        let err = orchestrator(backend.clone(), Some(2)).process(&doc, "text").unwrap_err();
        match err {
            AppError::ResultCountMismatch { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(backend.calls(), vec![2]);
    }
}
