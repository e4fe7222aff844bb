//! Lexicon-based classifier used when no external model is configured.

use once_cell::sync::Lazy;
use regex::Regex;

use super::SentimentBackend;
use crate::domain::error::Result;
use crate::domain::sentiment::RawPrediction;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "love", "loved", "amazing", "wonderful", "happy", "fantastic",
    "awesome", "best", "nice", "perfect", "pleased", "recommend", "delighted", "enjoy", "enjoyed",
    "brilliant", "superb", "helpful", "thanks", "thank",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "hated", "horrible", "worst", "sad", "angry",
    "disappointed", "disappointing", "poor", "broken", "useless", "refund", "slow", "rude",
    "frustrated", "frustrating", "never", "waste", "annoying",
];

fn word_pattern(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap()
}

static POSITIVE_PATTERN: Lazy<Regex> = Lazy::new(|| word_pattern(POSITIVE_WORDS));

static NEGATIVE_PATTERN: Lazy<Regex> = Lazy::new(|| word_pattern(NEGATIVE_WORDS));

#[derive(Debug, Default)]
pub struct LexiconBackend;

impl LexiconBackend {
    pub fn new() -> Self {
        Self
    }

    fn score(text: &str) -> RawPrediction {
        let positive_hits = POSITIVE_PATTERN.find_iter(text).count() as f64;
        let negative_hits = NEGATIVE_PATTERN.find_iter(text).count() as f64;
        let total = positive_hits + negative_hits;

        if positive_hits > negative_hits {
            RawPrediction::new("positive", positive_hits / total)
        } else if negative_hits > positive_hits {
            RawPrediction::new("negative", negative_hits / total)
        } else {
            RawPrediction::new("neutral", 0.5)
        }
    }
}

impl SentimentBackend for LexiconBackend {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn classify_one(&self, text: &str) -> Result<RawPrediction> {
        Ok(Self::score(text))
    }

    fn classify_many(&self, texts: &[String]) -> Result<Vec<RawPrediction>> {
        Ok(texts.iter().map(|t| Self::score(t)).collect())
    }
}
