#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use oi_tracker::models::Observation;
use oi_tracker::store::{MemoryTableStore, Row, StoreError, StoreResult, TableStore};
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build a row of owned strings
pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| c.to_string()).collect()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(d: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    d.and_hms_opt(hour, minute, 0).expect("valid time")
}

/// Observation with whole-number price
pub fn observation(symbol: &str, timestamp: NaiveDateTime, oi: u64, price: i64) -> Observation {
    Observation::new(symbol, timestamp, Some(oi), Some(Decimal::new(price, 0)))
}

/// Write an observations CSV to a temp file
pub fn observations_csv(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "symbol,timestamp,expiry,open_interest,price").expect("write header");
    for line in lines {
        writeln!(file, "{}", line).expect("write line");
    }
    file.flush().expect("flush");
    file
}

/// Store operation to make fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    ReadHeader,
    Clear,
    WriteHeader,
    Append,
}

/// Memory store that fails one kind of operation and counts appends
pub struct FailingStore {
    pub inner: MemoryTableStore,
    pub fail_on: FailOn,
    pub append_calls: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: MemoryTableStore, fail_on: FailOn) -> Self {
        Self {
            inner,
            fail_on,
            append_calls: AtomicUsize::new(0),
        }
    }

    pub fn appends(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    fn unavailable(&self, op: FailOn) -> StoreResult<()> {
        if self.fail_on == op {
            Err(StoreError::Unavailable(format!("{:?} refused", op)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TableStore for FailingStore {
    async fn read_header(&self, table: &str) -> StoreResult<Row> {
        self.unavailable(FailOn::ReadHeader)?;
        self.inner.read_header(table).await
    }

    async fn clear(&self, table: &str) -> StoreResult<()> {
        self.unavailable(FailOn::Clear)?;
        self.inner.clear(table).await
    }

    async fn write_header(&self, table: &str, columns: &[String]) -> StoreResult<()> {
        self.unavailable(FailOn::WriteHeader)?;
        self.inner.write_header(table, columns).await
    }

    async fn append_rows(&self, table: &str, rows: &[Row]) -> StoreResult<()> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        self.unavailable(FailOn::Append)?;
        self.inner.append_rows(table, rows).await
    }

    async fn read_rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        self.inner.read_rows(table).await
    }
}
