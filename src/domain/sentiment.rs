use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }

    /// Trimmed, case-insensitive match; anything unknown is `Neutral`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "POSITIVE" => SentimentLabel::Positive,
            "NEGATIVE" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }

    /// Canned sentence shown next to a prediction
    pub fn explanation(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => {
                "This looks mostly positive. Great choice of words and tone!"
            }
            SentimentLabel::Negative => {
                "This sounds negative. The model detects frustration or sadness."
            }
            SentimentLabel::Neutral => "The tone seems neutral or balanced.",
        }
    }

    /// CSS class used by the web page badge
    pub fn badge_class(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "label-positive",
            SentimentLabel::Negative => "label-negative",
            SentimentLabel::Neutral => "label-neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prediction as produced by a backend. Every field may be missing or of the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPrediction {
    pub label: Option<Value>,
    pub score: Option<Value>,
    pub explanation: Option<Value>,
}

impl RawPrediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: Some(Value::String(label.into())),
            score: Some(Value::from(score)),
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(Value::String(explanation.into()));
        self
    }

    /// Read a prediction out of arbitrary JSON; non-objects yield an empty prediction
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                label: map.get("label").cloned().filter(|v| !v.is_null()),
                score: map.get("score").cloned().filter(|v| !v.is_null()),
                explanation: map.get("explanation").cloned().filter(|v| !v.is_null()),
            },
            _ => Self::default(),
        }
    }

    pub fn label_str(&self) -> Option<&str> {
        self.label.as_ref().and_then(Value::as_str)
    }

    pub fn score_f64(&self) -> Option<f64> {
        self.score.as_ref().and_then(coerce_score)
    }
}

/// Numeric reading of a loosely typed score: numbers, numeric strings and booleans.
/// Non-finite results count as unreadable.
pub fn coerce_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    score.is_finite().then_some(score)
}

/// Canonical per-row result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub label: SentimentLabel,
    pub score: f64,
    pub explanation: String,
}
