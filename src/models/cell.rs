use super::delta::ChangePct;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;

/// Date format written to tables
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format written to tables
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A scalar destined for one table cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    /// Rendered with two decimals
    Number(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Empty,
}

impl CellValue {
    /// Percentage cell: two decimals, or blank when not computable
    pub fn pct(change: ChangePct) -> Self {
        match change {
            ChangePct::Defined(v) => CellValue::Number(v),
            ChangePct::NotComputable => CellValue::Empty,
        }
    }

    /// Optional unsigned quantity, blank when absent
    pub fn quantity(value: Option<u64>) -> Self {
        match value.and_then(|v| i64::try_from(v).ok()) {
            Some(v) => CellValue::Integer(v),
            None => CellValue::Empty,
        }
    }

    /// Optional price, blank when absent
    pub fn price(value: Option<Decimal>) -> Self {
        value.map(CellValue::Decimal).unwrap_or(CellValue::Empty)
    }

    /// Optional date, blank when absent
    pub fn date(value: Option<NaiveDate>) -> Self {
        value.map(CellValue::Date).unwrap_or(CellValue::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Scalar form accepted by the stores
    pub fn to_cell_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Number(v) => write!(f, "{:.2}", v),
            CellValue::Decimal(v) => write!(f, "{}", v.normalize()),
            CellValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            CellValue::DateTime(t) => write!(f, "{}", t.format(DATETIME_FORMAT)),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            CellValue::Number(value)
        } else {
            CellValue::Empty
        }
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}
