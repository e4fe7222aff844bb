// ============================================================
// HTTP INTERFACE
// ============================================================
// Single page, JSON API and file downloads for the sentiment pipeline

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::application::{BatchSentimentUseCase, SentimentModel, SingleSentimentUseCase};
use crate::domain::batch::{BatchRequest, ExportFormat};
use crate::domain::error::{AppError, Result};
use crate::domain::tabular::TablePreview;
use crate::infrastructure::config::{BackendKind, Settings};
use crate::infrastructure::sentiment_backend::BackendFactory;
use crate::infrastructure::storage::{
    create_request_dir, prune_expired_requests, resolve_request_file, sanitize_file_name,
};

const INDEX_HTML: &str = include_str!("index.html");
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub settings: Settings,
    pub backend: Arc<BackendFactory>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn new(settings: Settings, backend: Arc<BackendFactory>) -> Self {
        Self {
            settings,
            backend,
            logs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn model(&self) -> Result<SentimentModel> {
        Ok(SentimentModel::new(self.backend.get()?))
    }

    fn run_batch(&self, upload: BatchUpload) -> Result<BatchResponse> {
        let file_name = sanitize_file_name(&upload.file_name)
            .ok_or_else(|| AppError::InputMissing("Please upload a file first.".to_string()))?;
        let content = BASE64
            .decode(upload.content_base64.trim())
            .map_err(|e| AppError::Validation(format!("Invalid file encoding: {}", e)))?;
        if upload.text_column.trim().is_empty() {
            return Err(AppError::InputMissing(
                "Please enter the column name that contains the text.".to_string(),
            ));
        }

        let upload_dir = &self.settings.storage.upload_dir;
        if let Some(max_age) = self.settings.storage.retention() {
            let removed = prune_expired_requests(upload_dir, max_age)?;
            if removed > 0 {
                debug!(removed, "Pruned expired request dirs");
            }
        }
        let (id, request_dir) = create_request_dir(upload_dir)?;
        let source = request_dir.join(&file_name);
        fs::write(&source, &content)?;

        let use_case = BatchSentimentUseCase::new(&self.settings.batch, self.model()?)?;
        let request = BatchRequest::new(
            &source,
            upload.text_column,
            ExportFormat::from_flag(&upload.export_as),
        );
        let result = use_case.process_file(&request)?;

        let output_file = result
            .output_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| AppError::Internal("Output file has no name".to_string()))?;

        Ok(BatchResponse {
            download_url: download_path(&id.to_string(), &output_file)?,
            output_file,
            preview: result.preview,
        })
    }
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub label: String,
    pub score: f64,
    pub explanation: String,
    pub badge: String,
}

#[derive(Deserialize)]
pub struct BatchUpload {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub content_base64: String,
    #[serde(default)]
    pub text_column: String,
    #[serde(default)]
    pub export_as: String,
}

#[derive(Serialize)]
pub struct BatchResponse {
    pub download_url: String,
    pub output_file: String,
    pub preview: TablePreview,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: BackendKind,
    backend_ready: bool,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
    };
    if err.is_client_error() {
        HttpResponse::BadRequest().json(body)
    } else if err.is_backend_error() {
        HttpResponse::BadGateway().json(body)
    } else if matches!(err, AppError::NotFound(_)) {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::InternalServerError().json(body)
    }
}

fn blocking_failed(e: actix_web::error::BlockingError) -> AppError {
    AppError::Internal(format!("Worker thread failed: {}", e))
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[post("/analyze")]
async fn analyze(data: web::Data<HttpState>, req: web::Json<AnalyzeRequest>) -> impl Responder {
    let text = req.into_inner().text;
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Analyzing text ({} chars)", text.chars().count()),
    );

    let state = data.clone();
    let outcome = web::block(move || {
        let use_case = SingleSentimentUseCase::new(state.model()?);
        use_case.analyze(&text)
    })
    .await
    .map_err(blocking_failed)
    .and_then(|r| r);

    match outcome {
        Ok(record) => HttpResponse::Ok().json(AnalyzeResponse {
            label: record.label.to_string(),
            score: record.score,
            badge: record.label.badge_class().to_string(),
            explanation: record.explanation,
        }),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Analysis failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[post("/batch")]
async fn batch(data: web::Data<HttpState>, req: web::Json<BatchUpload>) -> impl Responder {
    let upload = req.into_inner();
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!(
            "Batch request (file={} column={} export={})",
            upload.file_name, upload.text_column, upload.export_as
        ),
    );

    let state = data.clone();
    let outcome = web::block(move || state.run_batch(upload))
        .await
        .map_err(blocking_failed)
        .and_then(|r| r);

    match outcome {
        Ok(response) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!(
                    "Batch finished: {} rows, output {}",
                    response.preview.total_rows, response.output_file
                ),
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Batch failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/download/{id}/{file}")]
async fn download(data: web::Data<HttpState>, path: web::Path<(String, String)>) -> impl Responder {
    let (id, file) = path.into_inner();
    let upload_dir = data.settings.storage.upload_dir.clone();

    let outcome = web::block(move || -> Result<(String, Vec<u8>)> {
        let target = resolve_request_file(&upload_dir, &id, &file)
            .filter(|p| p.is_file())
            .ok_or_else(|| AppError::NotFound(format!("File not found: {}", file)))?;
        Ok((file, fs::read(&target)?))
    })
    .await
    .map_err(blocking_failed)
    .and_then(|r| r);

    match outcome {
        Ok((file, bytes)) => HttpResponse::Ok()
            .content_type(content_type_for(&file))
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file),
            ))
            .body(bytes),
        Err(e) => {
            add_log(&data.logs, "WARN", "HttpApi", &format!("Download failed: {}", e));
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data
        .logs
        .lock()
        .map(|logs| logs.clone())
        .unwrap_or_default();
    HttpResponse::Ok().json(logs)
}

#[get("/health")]
async fn health(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        backend: data.settings.backend.kind,
        backend_ready: data.backend.is_initialized(),
    })
}

/// `/api/download/<id>/<file>` with each segment percent-encoded
fn download_path(id: &str, file: &str) -> Result<String> {
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| AppError::Internal(format!("Invalid base url: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Internal("Base url cannot hold a path".to_string()))?
        .pop_if_empty()
        .extend(["api", "download", id, file]);
    Ok(url.path().to_string())
}

fn content_type_for(file: &str) -> &'static str {
    let is_csv = Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        ExportFormat::Csv.content_type()
    } else {
        ExportFormat::Xlsx.content_type()
    }
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };

    match level {
        "ERROR" => error!(source = source, "{}", message),
        "WARN" => warn!(source = source, "{}", message),
        _ => info!(source = source, "{}", message),
    }

    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Routes shared by the server and the handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(
        web::scope("/api")
            .service(analyze)
            .service(batch)
            .service(download)
            .service(get_logs)
            .service(health),
    );
}

pub fn start_server(state: HttpState) -> std::io::Result<Server> {
    let host = state.settings.server.host.clone();
    let port = state.settings.server.port;
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // local tool, any origin

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(64 * 1024 * 1024))
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run();

    info!(%host, port, "HTTP server listening");
    Ok(server)
}
