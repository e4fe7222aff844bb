use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::infrastructure::tabular::encoding::CsvEncoding;

pub const DEFAULT_CONFIG_FILE: &str = "sentiment.toml";
pub const CONFIG_PATH_ENV: &str = "SENTIMENT_CONFIG";
pub const ENV_PREFIX: &str = "SENTIMENT_";
pub const DEFAULT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub batch: BatchSettings,
    pub backend: BackendSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Match `review` against a `Review` column
    pub case_insensitive_columns: bool,

    /// Rows returned in the preview table
    pub max_preview_rows: usize,

    /// Texts per backend call; `None` or `0` sends the whole column at once
    pub batch_size: Option<usize>,

    /// Encodings tried in order when reading CSV uploads
    pub csv_encodings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Lexicon,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub upload_dir: PathBuf,

    /// Request directories older than this are removed; `0` keeps everything
    pub retention_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            case_insensitive_columns: true,
            max_preview_rows: 20,
            batch_size: Some(1000),
            csv_encodings: CsvEncoding::defaults()
                .iter()
                .map(|e| e.label().to_string())
                .collect(),
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::Lexicon,
            endpoint: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_dir: std::env::temp_dir().join("sentiment-intelligence"),
            retention_secs: 24 * 60 * 60,
        }
    }
}

impl StorageSettings {
    /// `None` when cleanup is disabled
    pub fn retention(&self) -> Option<Duration> {
        (self.retention_secs > 0).then(|| Duration::from_secs(self.retention_secs))
    }
}

impl BatchSettings {
    /// Effective chunk size, `None` when chunking is disabled
    pub fn chunk_size(&self) -> Option<usize> {
        self.batch_size.filter(|size| *size > 0)
    }

    pub fn encodings(&self) -> Result<Vec<CsvEncoding>> {
        self.csv_encodings
            .iter()
            .map(|label| {
                CsvEncoding::from_label(label).ok_or_else(|| {
                    AppError::Config(format!("Unknown CSV encoding '{}'", label))
                })
            })
            .collect()
    }
}

impl Settings {
    /// Defaults, then the TOML file, then `SENTIMENT_*` environment variables
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let settings: Settings = Self::figment(path)
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config("server.port must be > 0".to_string()));
        }
        if self.batch.max_preview_rows == 0 {
            return Err(AppError::Config(
                "batch.max_preview_rows must be > 0".to_string(),
            ));
        }
        if self.batch.csv_encodings.is_empty() {
            return Err(AppError::Config(
                "batch.csv_encodings must list at least one encoding".to_string(),
            ));
        }
        self.batch.encodings()?;

        if self.backend.kind == BackendKind::Http
            && self
                .backend
                .endpoint
                .as_deref()
                .map(|e| e.trim().is_empty())
                .unwrap_or(true)
        {
            return Err(AppError::Config(
                "backend.endpoint is required for the http backend".to_string(),
            ));
        }
        Ok(())
    }
}
