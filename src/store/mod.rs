//! Table stores.
//!
//! A table is an ordered sequence of string rows identified by name, where
//! row 1 holds the column labels. Stores only ever clear a table, write its
//! first row, append trailing rows, or read it back.

pub mod csv_store;
pub mod memory;
pub mod sheets;

pub use csv_store::CsvTableStore;
pub use memory::MemoryTableStore;
pub use sheets::SheetsTableStore;

use crate::config::{StoreBackend, StoreConfig};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// A row as written to a store: already stringified scalars.
pub type Row = Vec<String>;

/// Errors raised by a table store, tagged with the failing operation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read header of '{table}': {message}")]
    ReadHeader { table: String, message: String },

    #[error("Failed to clear '{table}': {message}")]
    Clear { table: String, message: String },

    #[error("Failed to write header of '{table}': {message}")]
    WriteHeader { table: String, message: String },

    #[error("Failed to append to '{table}': {message}")]
    Append { table: String, message: String },

    #[error("Failed to read '{table}': {message}")]
    Read { table: String, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Backend that persists tables.
///
/// Implementations must preserve row order within an `append_rows` call.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// First row of the table, or an empty vec if the table has no rows
    async fn read_header(&self, table: &str) -> StoreResult<Row>;

    /// Remove every row, header included
    async fn clear(&self, table: &str) -> StoreResult<()>;

    /// Write `columns` as row 1
    async fn write_header(&self, table: &str, columns: &[String]) -> StoreResult<()>;

    /// Append rows after the last existing row
    async fn append_rows(&self, table: &str, rows: &[Row]) -> StoreResult<()>;

    /// All rows, header first
    async fn read_rows(&self, table: &str) -> StoreResult<Vec<Row>>;
}

/// Open the backend selected by configuration
pub fn open(config: &StoreConfig) -> StoreResult<Arc<dyn TableStore>> {
    match config.backend {
        StoreBackend::Csv => Ok(Arc::new(CsvTableStore::new(&config.dir)?)),
        StoreBackend::Sheets => {
            let sheets = config.sheets.as_ref().ok_or_else(|| {
                StoreError::Unavailable("sheets backend selected without sheets config".to_string())
            })?;
            Ok(Arc::new(SheetsTableStore::new(sheets)?))
        }
    }
}
