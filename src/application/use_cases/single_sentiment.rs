use tracing::info;

use super::result_normalizer::normalize;
use super::sentiment_model::SentimentModel;
use crate::domain::error::Result;
use crate::domain::sentiment::ClassificationRecord;

pub struct SingleSentimentUseCase {
    model: SentimentModel,
}

impl SingleSentimentUseCase {
    pub fn new(model: SentimentModel) -> Self {
        Self { model }
    }

    pub fn analyze(&self, text: &str) -> Result<ClassificationRecord> {
        let raw = self.model.analyze(text)?;
        let record = normalize(&raw);
        info!(
            chars = text.chars().count(),
            label = %record.label,
            score = record.score,
            "Single text analysed"
        );
        Ok(record)
    }
}
