use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// No file supplied, or a blank column name.
    InputMissing(String),
    LoadError(String),
    EmptyDataset(String),
    ColumnNotFound {
        requested: String,
        available: Vec<String>,
    },
    EmptyColumn(String),
    BackendFailure(String),
    ResultCountMismatch {
        expected: usize,
        actual: usize,
    },
    WriteError(String),
    Config(String),
    Validation(String),
    NotFound(String),
    Io(String),
    Internal(String),
}

impl AppError {
    /// Errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InputMissing(_)
                | AppError::LoadError(_)
                | AppError::EmptyDataset(_)
                | AppError::ColumnNotFound { .. }
                | AppError::EmptyColumn(_)
                | AppError::Validation(_)
        )
    }

    pub fn is_backend_error(&self) -> bool {
        matches!(
            self,
            AppError::BackendFailure(_) | AppError::ResultCountMismatch { .. }
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputMissing(msg) => write!(f, "{}", msg),
            AppError::LoadError(msg) => write!(f, "Could not read file: {}", msg),
            AppError::EmptyDataset(msg) => write!(f, "{}", msg),
            AppError::ColumnNotFound {
                requested,
                available,
            } => write!(
                f,
                "Column '{}' not found. Available columns: {}",
                requested,
                available.join(", ")
            ),
            AppError::EmptyColumn(column) => write!(
                f,
                "Column '{}' is empty or all values are missing.",
                column
            ),
            AppError::BackendFailure(msg) => write!(f, "Sentiment analysis failed: {}", msg),
            AppError::ResultCountMismatch { expected, actual } => write!(
                f,
                "Mismatch in results. Expected {} results, got {}.",
                expected, actual
            ),
            AppError::WriteError(msg) => write!(f, "Could not write the output file: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Io(msg) => write!(f, "IO error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
