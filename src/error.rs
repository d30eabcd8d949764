use crate::store::StoreError;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Table store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Market data source errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Header mismatch under the reject policy
    #[error("Schema mismatch on table '{table}': expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        table: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error came from an unreachable or failing store
    pub fn is_store_error(&self) -> bool {
        matches!(self, AppError::Store(_))
    }

    /// Check if the data source simply had nothing to offer yet
    pub fn is_no_data(&self) -> bool {
        matches!(self, AppError::Fetch(FetchError::NoData(_)))
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 78,
            AppError::Validation(_) | AppError::SchemaMismatch { .. } => 65,
            AppError::Store(_) => 69,
            AppError::Fetch(FetchError::NoData(_)) => 0,
            AppError::Fetch(_) => 66,
        }
    }
}

/// Market data source errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// The source answered but had no observations for the request
    #[error("No data available: {0}")]
    NoData(String),

    /// The source could not be read
    #[error("Source unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be parsed into an observation
    #[error("Parse error at record {record}: {message}")]
    Parse { record: u64, message: String },
}

impl From<csv::Error> for FetchError {
    fn from(err: csv::Error) -> Self {
        let record = err.position().map(|p| p.record()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => FetchError::Io(io),
            kind => FetchError::Parse {
                record,
                message: format!("{:?}", kind),
            },
        }
    }
}
