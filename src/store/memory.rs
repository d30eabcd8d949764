use super::{Row, StoreResult, TableStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process table store
#[derive(Clone, Default)]
pub struct MemoryTableStore {
    tables: Arc<RwLock<HashMap<String, Vec<Row>>>>,
}

impl MemoryTableStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with existing rows (header first)
    pub async fn insert_table(&self, table: &str, rows: Vec<Row>) {
        self.tables.write().await.insert(table.to_string(), rows);
    }

    /// Number of rows in a table, header included
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn read_header(&self, table: &str) -> StoreResult<Row> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|rows| rows.first().cloned())
            .unwrap_or_default())
    }

    async fn clear(&self, table: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().clear();
        Ok(())
    }

    async fn write_header(&self, table: &str, columns: &[String]) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        if rows.is_empty() {
            rows.push(columns.to_vec());
        } else {
            rows[0] = columns.to_vec();
        }
        Ok(())
    }

    async fn append_rows(&self, table: &str, rows: &[Row]) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .extend(rows.iter().cloned());
        Ok(())
    }

    async fn read_rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).cloned().unwrap_or_default())
    }
}
