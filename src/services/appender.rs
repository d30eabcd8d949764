use crate::config::HeaderMismatchPolicy;
use crate::error::{AppError, AppResult};
use crate::models::{CellValue, TableSchema};
use crate::store::{Row, TableStore};
use std::sync::Arc;
use tracing::{info, warn};

/// What reconciliation did to row 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
    /// Row 1 already matched
    Matched,
    /// Table was empty; header written
    Written,
    /// Row 1 differed; table cleared and header rewritten
    Reset,
}

/// Appends row batches to tables after making row 1 equal the expected header.
///
/// Calls to the store are strictly sequential. Nothing coordinates concurrent
/// writers to the same table.
pub struct SchemaAppender {
    store: Arc<dyn TableStore>,
    policy: HeaderMismatchPolicy,
}

impl SchemaAppender {
    /// Create an appender with the default clear-and-overwrite policy
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            policy: HeaderMismatchPolicy::default(),
        }
    }

    /// Set the header mismatch policy
    pub fn with_policy(mut self, policy: HeaderMismatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> HeaderMismatchPolicy {
        self.policy
    }

    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    /// Make row 1 of `table` equal `expected`.
    ///
    /// Under `ClearAndOverwrite` a mismatch wipes every row of the table.
    pub async fn ensure_header(&self, table: &str, expected: &[String]) -> AppResult<HeaderStatus> {
        let current = self.store.read_header(table).await?;

        if current == expected {
            return Ok(HeaderStatus::Matched);
        }

        if current.is_empty() && self.is_blank(table).await? {
            info!("Table '{}' has no header, writing {:?}", table, expected);
            self.store.clear(table).await?;
            self.store.write_header(table, expected).await?;
            return Ok(HeaderStatus::Written);
        }

        match self.policy {
            HeaderMismatchPolicy::Reject => Err(AppError::SchemaMismatch {
                table: table.to_string(),
                expected: expected.to_vec(),
                found: current,
            }),
            HeaderMismatchPolicy::ClearAndOverwrite => {
                warn!(
                    "Header mismatch on '{}': found {:?}, expected {:?}. Clearing all rows",
                    table, current, expected
                );
                self.store.clear(table).await?;
                self.store.write_header(table, expected).await?;
                Ok(HeaderStatus::Reset)
            }
        }
    }

    /// True when the table holds no non-empty cell. A blank row 1 above data
    /// does not count.
    async fn is_blank(&self, table: &str) -> AppResult<bool> {
        let rows = self.store.read_rows(table).await?;
        Ok(rows.iter().all(|row| row.iter().all(|cell| cell.is_empty())))
    }

    /// Reconcile the header of each schema's table without appending
    pub async fn ensure_schemas(&self, schemas: &[TableSchema]) -> AppResult<Vec<(String, HeaderStatus)>> {
        let mut statuses = Vec::with_capacity(schemas.len());
        for schema in schemas {
            let status = self.ensure_header(schema.table(), &schema.header()).await?;
            info!("Table '{}': {:?}", schema.table(), status);
            statuses.push((schema.table().to_string(), status));
        }
        Ok(statuses)
    }

    /// Reconcile the header, then append pre-stringified rows in order.
    ///
    /// Every row must have exactly `expected_columns.len()` cells; a ragged
    /// row fails before the store is touched. Returns the number of rows
    /// appended.
    pub async fn reconcile_and_append(
        &self,
        table: &str,
        expected_columns: &[String],
        new_rows: &[Row],
    ) -> AppResult<usize> {
        if let Some((index, row)) = new_rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected_columns.len())
        {
            return Err(AppError::Validation(format!(
                "Row {} has {} cells but table '{}' has {} columns",
                index,
                row.len(),
                table,
                expected_columns.len()
            )));
        }

        self.ensure_header(table, expected_columns).await?;

        if new_rows.is_empty() {
            return Ok(0);
        }

        self.store.append_rows(table, new_rows).await?;
        info!("Appended {} rows to '{}'", new_rows.len(), table);

        Ok(new_rows.len())
    }

    /// Typed variant: validate cells against the schema, stringify, append.
    pub async fn append(&self, schema: &TableSchema, new_rows: &[Vec<CellValue>]) -> AppResult<usize> {
        let mut rows: Vec<Row> = Vec::with_capacity(new_rows.len());
        for (index, row) in new_rows.iter().enumerate() {
            schema
                .validate_row(row)
                .map_err(|e| AppError::Validation(format!("Row {}: {}", index, e)))?;
            rows.push(row.iter().map(CellValue::to_cell_string).collect());
        }

        self.reconcile_and_append(schema.table(), &schema.header(), &rows)
            .await
    }
}
