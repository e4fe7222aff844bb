use serde_json::Value;

use crate::domain::sentiment::{coerce_score, ClassificationRecord, RawPrediction, SentimentLabel};

/// Coerce a raw backend prediction into a record. Never fails:
/// unknown or missing labels become NEUTRAL, unreadable scores 0.0,
/// missing or empty explanations "".
pub fn normalize(raw: &RawPrediction) -> ClassificationRecord {
    let label = raw
        .label
        .as_ref()
        .and_then(Value::as_str)
        .map(SentimentLabel::parse_lenient)
        .unwrap_or(SentimentLabel::Neutral);

    let score = raw.score.as_ref().and_then(coerce_score).unwrap_or(0.0);

    let explanation = raw
        .explanation
        .as_ref()
        .and_then(Value::as_str)
        .filter(|e| !e.is_empty())
        .unwrap_or_default()
        .to_string();

    ClassificationRecord {
        label,
        score,
        explanation,
    }
}

pub fn normalize_all(raw: &[RawPrediction]) -> Vec<ClassificationRecord> {
    raw.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawPrediction {
        RawPrediction::from_json(&value)
    }

    #[test]
    fn test_well_formed_prediction() {
        let record = normalize(&raw(json!({
            "label": " positive ",
            "score": 0.9312,
            "explanation": "Nice"
        })));
        assert_eq!(record.label, SentimentLabel::Positive);
        assert_eq!(record.score, 0.9312);
        assert_eq!(record.explanation, "Nice");
    }

    #[test]
    fn test_unknown_label_defaults_to_neutral() {
        assert_eq!(normalize(&raw(json!({ "label": "LABEL_1" }))).label, SentimentLabel::Neutral);
        assert_eq!(normalize(&raw(json!({ "label": "" }))).label, SentimentLabel::Neutral);
        assert_eq!(normalize(&raw(json!({ "label": 7 }))).label, SentimentLabel::Neutral);
        assert_eq!(normalize(&raw(json!({}))).label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_bad_scores_default_to_zero() {
        assert_eq!(normalize(&raw(json!({ "score": "abc" }))).score, 0.0);
        assert_eq!(normalize(&raw(json!({ "score": null }))).score, 0.0);
        assert_eq!(normalize(&raw(json!({ "score": {"x": 1} }))).score, 0.0);
        assert_eq!(normalize(&raw(json!({ "score": "0.42" }))).score, 0.42);
    }

    #[test]
    fn test_out_of_range_score_passes_through() {
        assert_eq!(normalize(&raw(json!({ "score": 3.5 }))).score, 3.5);
        assert_eq!(normalize(&raw(json!({ "score": -1 }))).score, -1.0);
    }

    #[test]
    fn test_explanation_defaults_to_empty() {
        assert_eq!(normalize(&raw(json!({ "explanation": "" }))).explanation, "");
        assert_eq!(normalize(&raw(json!({ "explanation": 12 }))).explanation, "");
        assert_eq!(normalize(&RawPrediction::default()).explanation, "");
    }

    #[test]
    fn test_label_is_always_one_of_three() {
        let inputs = vec![
            json!(null),
            json!("string"),
            json!([1, 2]),
            json!({ "label": ["POSITIVE"] }),
            json!({ "label": "negative", "score": "bad" }),
            json!({ "label": "Neutral", "score": true }),
        ];
        let known = [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ];
        for input in inputs {
            let record = normalize(&raw(input));
            assert!(known.contains(&record.label));
        }
    }
}
