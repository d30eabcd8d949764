use super::{Row, StoreError, StoreResult, TableStore};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Table store keeping one CSV file per table inside a directory
pub struct CsvTableStore {
    root: PathBuf,
}

impl CsvTableStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            StoreError::Unavailable(format!("cannot create {}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    /// Directory holding the table files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a table. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn table_path(&self, table: &str) -> PathBuf {
        let file: String = table
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.csv", file))
    }

    fn load(&self, table: &str) -> Result<Vec<Row>, String> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| e.to_string())?;
        reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(str::to_string).collect())
                    .map_err(|e| e.to_string())
            })
            .collect()
    }

    fn write_all(&self, table: &str, rows: &[Row]) -> Result<(), String> {
        let file = File::create(self.table_path(table)).map_err(|e| e.to_string())?;
        write_rows(file, rows)
    }
}

fn write_rows(file: File, rows: &[Row]) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);
    for row in rows {
        writer.write_record(row).map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())
}

#[async_trait]
impl TableStore for CsvTableStore {
    async fn read_header(&self, table: &str) -> StoreResult<Row> {
        let rows = self.load(table).map_err(|message| StoreError::ReadHeader {
            table: table.to_string(),
            message,
        })?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn clear(&self, table: &str) -> StoreResult<()> {
        File::create(self.table_path(table)).map_err(|e| StoreError::Clear {
            table: table.to_string(),
            message: e.to_string(),
        })?;
        debug!("Cleared {}", self.table_path(table).display());
        Ok(())
    }

    async fn write_header(&self, table: &str, columns: &[String]) -> StoreResult<()> {
        let to_err = |message: String| StoreError::WriteHeader {
            table: table.to_string(),
            message,
        };
        let mut rows = self.load(table).map_err(to_err)?;
        if rows.is_empty() {
            rows.push(columns.to_vec());
        } else {
            rows[0] = columns.to_vec();
        }
        self.write_all(table, &rows).map_err(to_err)
    }

    async fn append_rows(&self, table: &str, rows: &[Row]) -> StoreResult<()> {
        let to_err = |message: String| StoreError::Append {
            table: table.to_string(),
            message,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.table_path(table))
            .map_err(|e| to_err(e.to_string()))?;
        write_rows(file, rows).map_err(to_err)
    }

    async fn read_rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        self.load(table).map_err(|message| StoreError::Read {
            table: table.to_string(),
            message,
        })
    }
}
