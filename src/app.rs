use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::Settings;
use crate::infrastructure::sentiment_backend::BackendFactory;
use crate::infrastructure::storage::{ensure_upload_root, prune_expired_requests};
use crate::interfaces::http::{start_server, HttpState};

pub async fn run() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let settings = Settings::load()?;
    let upload_root = ensure_upload_root(&settings.storage.upload_dir)?;
    info!(
        upload_dir = %upload_root.display(),
        backend = ?settings.backend.kind,
        model = %settings.backend.model,
        "Starting sentiment service"
    );
    if let Some(max_age) = settings.storage.retention() {
        let removed = prune_expired_requests(&upload_root, max_age)?;
        info!(removed, retention_secs = max_age.as_secs(), "Pruned expired request dirs");
    }

    let backend = Arc::new(BackendFactory::new(settings.backend.clone()));
    let server = start_server(HttpState::new(settings, backend))?;
    server
        .await
        .map_err(|e| AppError::Internal(format!("HTTP server stopped: {}", e)))
}
