pub mod http;
pub mod lexicon;

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::domain::error::Result;
use crate::domain::sentiment::RawPrediction;
use crate::infrastructure::config::{BackendKind, BackendSettings};
use http::HttpBackend;
use lexicon::LexiconBackend;

/// A text classifier. Calls are blocking and may be slow.
pub trait SentimentBackend: Send + Sync {
    fn name(&self) -> &str;

    fn classify_one(&self, text: &str) -> Result<RawPrediction>;

    /// One prediction per input, in input order
    fn classify_many(&self, texts: &[String]) -> Result<Vec<RawPrediction>>;
}

/// Builds the configured backend on first use and hands out the cached handle afterwards
pub struct BackendFactory {
    settings: BackendSettings,
    backend: OnceCell<Arc<dyn SentimentBackend>>,
}

impl BackendFactory {
    pub fn new(settings: BackendSettings) -> Self {
        Self {
            settings,
            backend: OnceCell::new(),
        }
    }

    /// A factory whose handle is already initialised
    pub fn with_backend(backend: Arc<dyn SentimentBackend>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(backend);
        Self {
            settings: BackendSettings::default(),
            backend: cell,
        }
    }

    pub fn get(&self) -> Result<Arc<dyn SentimentBackend>> {
        self.backend
            .get_or_try_init(|| self.build())
            .map(Arc::clone)
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.get().is_some()
    }

    fn build(&self) -> Result<Arc<dyn SentimentBackend>> {
        let backend: Arc<dyn SentimentBackend> = match self.settings.kind {
            BackendKind::Lexicon => Arc::new(LexiconBackend::new()),
            BackendKind::Http => Arc::new(HttpBackend::from_settings(&self.settings)?),
        };
        info!(
            backend = backend.name(),
            model = %self.settings.model,
            "Sentiment backend initialised"
        );
        Ok(backend)
    }
}
