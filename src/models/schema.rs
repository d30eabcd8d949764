//! Typed table schemas shared by every writer.
//!
//! A schema is the table name plus its ordered columns; the column names form
//! the header that reconciliation enforces on row 1.

use super::cell::CellValue;

/// Kind of scalar a column holds. Blank cells are accepted in every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Text,
    Integer,
    Number,
    Date,
    DateTime,
}

impl ScalarKind {
    /// Whether a cell may be written to a column of this kind
    pub fn accepts(&self, cell: &CellValue) -> bool {
        match (self, cell) {
            (_, CellValue::Empty) => true,
            (ScalarKind::Text, _) => true,
            (ScalarKind::Integer, CellValue::Integer(_)) => true,
            (
                ScalarKind::Number,
                CellValue::Number(_) | CellValue::Decimal(_) | CellValue::Integer(_),
            ) => true,
            (ScalarKind::Date, CellValue::Date(_)) => true,
            (ScalarKind::DateTime, CellValue::DateTime(_)) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Text => "text",
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "datetime",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ScalarKind,
}

/// Ordered column list for a named table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    table: String,
    columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>, columns: &[(&str, ScalarKind)]) -> Self {
        Self {
            table: table.into(),
            columns: columns
                .iter()
                .map(|(name, kind)| Column {
                    name: name.to_string(),
                    kind: *kind,
                })
                .collect(),
        }
    }

    /// Untyped schema: every column is text
    pub fn from_names(table: impl Into<String>, names: &[&str]) -> Self {
        let columns: Vec<(&str, ScalarKind)> =
            names.iter().map(|n| (*n, ScalarKind::Text)).collect();
        Self::new(table, &columns)
    }

    /// Same columns, written to a different table
    pub fn renamed(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column labels in order
    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Position of the first column with this name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Check a row's arity and cell kinds against the schema
    pub fn validate_row(&self, row: &[CellValue]) -> Result<(), String> {
        if row.len() != self.columns.len() {
            return Err(format!(
                "Row has {} cells but table '{}' has {} columns",
                row.len(),
                self.table,
                self.columns.len()
            ));
        }
        for (column, cell) in self.columns.iter().zip(row) {
            if !column.kind.accepts(cell) {
                return Err(format!(
                    "Column '{}' of table '{}' expects {}, got {:?}",
                    column.name,
                    self.table,
                    column.kind.as_str(),
                    cell
                ));
            }
        }
        Ok(())
    }

    /// Intraday OI snapshot log
    pub fn oi_log() -> Self {
        Self::new(
            "OI_DailyLog",
            &[
                ("Timestamp", ScalarKind::DateTime),
                ("Symbol", ScalarKind::Text),
                ("LTP", ScalarKind::Number),
                ("OI", ScalarKind::Integer),
                ("OI Change", ScalarKind::Number),
            ],
        )
    }

    /// End-of-day classification summary
    pub fn eod_summary() -> Self {
        Self::new(
            "EOD_Summary",
            &[
                ("Date", ScalarKind::Date),
                ("Symbol", ScalarKind::Text),
                ("Start OI", ScalarKind::Integer),
                ("End OI", ScalarKind::Integer),
                ("Net OI Change (%)", ScalarKind::Number),
                ("Start Price", ScalarKind::Number),
                ("End Price", ScalarKind::Number),
                ("Price Change (%)", ScalarKind::Number),
                ("Classification", ScalarKind::Text),
                ("Anomaly", ScalarKind::Text),
            ],
        )
    }

    /// Near/far expiry rollover
    pub fn rollover() -> Self {
        Self::new(
            "Rollover",
            &[
                ("Date", ScalarKind::Date),
                ("Symbol", ScalarKind::Text),
                ("Near Expiry", ScalarKind::Date),
                ("Far Expiry", ScalarKind::Date),
                ("Near OI", ScalarKind::Integer),
                ("Far OI", ScalarKind::Integer),
                ("Rollover %", ScalarKind::Number),
            ],
        )
    }

    /// Expiry-day delivery proxy
    pub fn expiry_delivery() -> Self {
        Self::new(
            "Rollover_Analysis",
            &[
                ("Date", ScalarKind::Date),
                ("Symbol", ScalarKind::Text),
                ("Expiry", ScalarKind::Date),
                ("OI on Expiry", ScalarKind::Integer),
                ("OI Next Day", ScalarKind::Integer),
                ("Delivery Qty", ScalarKind::Integer),
                ("Rollover %", ScalarKind::Number),
                ("Delivery %", ScalarKind::Number),
            ],
        )
    }

    /// Every predefined schema
    pub fn all() -> Vec<Self> {
        vec![
            Self::oi_log(),
            Self::eod_summary(),
            Self::rollover(),
            Self::expiry_delivery(),
        ]
    }
}
