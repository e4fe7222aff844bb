use std::sync::Arc;

use serde_json::Value;

use crate::domain::error::Result;
use crate::domain::sentiment::{RawPrediction, SentimentLabel};
use crate::infrastructure::sentiment_backend::SentimentBackend;

pub const EMPTY_TEXT_EXPLANATION: &str = "Please enter some text to analyze.";

/// Adapter over a backend: uppercases labels, rounds scores and attaches the canned explanation
#[derive(Clone)]
pub struct SentimentModel {
    backend: Arc<dyn SentimentBackend>,
}

impl SentimentModel {
    pub fn new(backend: Arc<dyn SentimentBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Blank input never reaches the backend
    pub fn analyze(&self, text: &str) -> Result<RawPrediction> {
        if text.trim().is_empty() {
            return Ok(RawPrediction::new(SentimentLabel::Neutral.as_str(), 0.0)
                .with_explanation(EMPTY_TEXT_EXPLANATION));
        }
        let raw = self.backend.classify_one(text)?;
        Ok(annotate(&raw))
    }

    /// Whitespace-only entries are sent as `""`; output order follows the backend
    pub fn analyze_bulk(&self, texts: &[String]) -> Result<Vec<RawPrediction>> {
        let safe_texts: Vec<String> = texts
            .iter()
            .map(|t| {
                if t.trim().is_empty() {
                    String::new()
                } else {
                    t.clone()
                }
            })
            .collect();

        let raw = self.backend.classify_many(&safe_texts)?;
        Ok(raw.iter().map(annotate).collect())
    }
}

pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

fn annotate(raw: &RawPrediction) -> RawPrediction {
    let label = raw
        .label_str()
        .map(|l| l.to_uppercase())
        .unwrap_or_else(|| SentimentLabel::Neutral.as_str().to_string());
    let score = round_score(raw.score_f64().unwrap_or(0.0));
    let explanation = SentimentLabel::parse_lenient(&label).explanation();

    RawPrediction {
        label: Some(Value::String(label)),
        score: Some(Value::from(score)),
        explanation: Some(Value::String(explanation.to_string())),
    }
}
