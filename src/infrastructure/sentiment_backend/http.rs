use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use super::SentimentBackend;
use crate::domain::error::{AppError, Result};
use crate::domain::sentiment::{coerce_score, RawPrediction};
use crate::infrastructure::config::BackendSettings;

/// Remote text-classification endpoint speaking the Hugging Face inference shape:
/// `POST {"inputs": [...]}` answered by one `{label, score}` (or a list of candidates) per input.
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl HttpBackend {
    pub fn from_settings(settings: &BackendSettings) -> Result<Self> {
        let endpoint = settings
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                AppError::Config("backend.endpoint is required for the http backend".to_string())
            })?
            .to_string();

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::BackendFailure(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    fn post(&self, inputs: &[String]) -> Result<Value> {
        let body = json!({
            "inputs": inputs,
            "model": self.model,
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .map_err(|e| AppError::BackendFailure(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(AppError::BackendFailure(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        response
            .json()
            .map_err(|e| AppError::BackendFailure(format!("Failed to parse JSON: {}", e)))
    }
}

impl SentimentBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    fn classify_one(&self, text: &str) -> Result<RawPrediction> {
        self.classify_many(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::BackendFailure("Empty response from backend".to_string()))
    }

    fn classify_many(&self, texts: &[String]) -> Result<Vec<RawPrediction>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(endpoint = %self.endpoint, inputs = texts.len(), "Calling inference endpoint");
        let json = self.post(texts)?;
        parse_predictions(&json)
    }
}

/// Accepts `[{label, score}, ...]` or `[[{label, score}, ...], ...]`; in the nested form the
/// highest scoring candidate is used for each input.
pub fn parse_predictions(json: &Value) -> Result<Vec<RawPrediction>> {
    match json {
        Value::Array(items) => Ok(items.iter().map(parse_item).collect()),
        Value::Object(map) => match map.get("error") {
            Some(error) => Err(AppError::BackendFailure(format!(
                "Backend error: {}",
                error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string())
            ))),
            None => Err(AppError::BackendFailure(
                "Invalid response format: expected a list of predictions".to_string(),
            )),
        },
        _ => Err(AppError::BackendFailure(
            "Invalid response format: expected a list of predictions".to_string(),
        )),
    }
}

fn parse_item(item: &Value) -> RawPrediction {
    match item {
        Value::Array(candidates) => candidates
            .iter()
            .max_by(|a, b| {
                let a = a.get("score").and_then(coerce_score).unwrap_or(f64::MIN);
                let b = b.get("score").and_then(coerce_score).unwrap_or(f64::MIN);
                a.total_cmp(&b)
            })
            .map(RawPrediction::from_json)
            .unwrap_or_default(),
        other => RawPrediction::from_json(other),
    }
}
