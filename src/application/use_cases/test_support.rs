use std::sync::Mutex;

use crate::domain::error::{AppError, Result};
use crate::domain::sentiment::RawPrediction;
use crate::infrastructure::sentiment_backend::SentimentBackend;

/// Deterministic in-test backend that records how it was called
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<usize>>,
    seen: Mutex<Vec<String>>,
    fail_on_call: Option<usize>,
    drop_last: bool,
    misalign: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the n-th `classify_many` call (1-based)
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    /// Return one prediction fewer than requested
    pub fn dropping_last() -> Self {
        Self {
            drop_last: true,
            ..Self::default()
        }
    }

    /// Drop the first prediction of call 1 and repeat the last one of call 2
    pub fn misaligning() -> Self {
        Self {
            misalign: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seen_texts(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn predict(text: &str) -> RawPrediction {
        let lower = text.to_lowercase();
        if lower.contains("love") || lower.contains("great") {
            RawPrediction::new("positive", 0.987654)
        } else if lower.contains("terrible") || lower.contains("hate") {
            RawPrediction::new("negative", 0.912345)
        } else if lower.contains("label_1") {
            RawPrediction::new("LABEL_1", 0.4)
        } else {
            RawPrediction::new("neutral", 0.5)
        }
    }
}

impl SentimentBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn classify_one(&self, text: &str) -> Result<RawPrediction> {
        Ok(Self::predict(text))
    }

    fn classify_many(&self, texts: &[String]) -> Result<Vec<RawPrediction>> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(texts.len());
            calls.len()
        };
        self.seen.lock().unwrap().extend(texts.iter().cloned());

        if self.fail_on_call == Some(call_number) {
            return Err(AppError::BackendFailure("model crashed".to_string()));
        }

        let mut out: Vec<RawPrediction> = texts.iter().map(|t| Self::predict(t)).collect();
        if self.drop_last {
            out.pop();
        }
        if self.misalign {
            match call_number {
                1 if !out.is_empty() => {
                    out.remove(0);
                }
                2 => {
                    if let Some(last) = out.last().cloned() {
                        out.push(last);
                    }
                }
                _ => {}
            }
        }
        Ok(out)
    }
}
