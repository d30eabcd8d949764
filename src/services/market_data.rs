use crate::error::FetchError;
use crate::models::Observation;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Supplies observations for a set of symbols
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch(&self, symbols: &[String]) -> Result<Vec<Observation>, FetchError>;
}

/// One record of an observations CSV file
#[derive(Debug, Deserialize)]
struct ObservationRecord {
    symbol: String,
    timestamp: String,
    #[serde(default)]
    expiry: Option<String>,
    #[serde(default)]
    open_interest: Option<u64>,
    #[serde(default)]
    price: Option<Decimal>,
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or a bare date (midnight)
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Observations read from a CSV file with columns
/// `symbol,timestamp,expiry,open_interest,price`
pub struct CsvObservationSource {
    path: PathBuf,
}

impl CsvObservationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<Vec<Observation>, FetchError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut observations = Vec::new();
        for (index, record) in reader.deserialize::<ObservationRecord>().enumerate() {
            let record = record?;
            let line = index as u64 + 1;

            let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| FetchError::Parse {
                record: line,
                message: format!("invalid timestamp '{}'", record.timestamp),
            })?;

            let expiry = match record.expiry.as_deref().filter(|s| !s.is_empty()) {
                Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    FetchError::Parse {
                        record: line,
                        message: format!("invalid expiry '{}'", raw),
                    }
                })?),
                None => None,
            };

            let mut observation = Observation::new(
                record.symbol.to_uppercase(),
                timestamp,
                record.open_interest,
                record.price,
            );
            observation.expiry = expiry;
            observations.push(observation);
        }

        Ok(observations)
    }
}

#[async_trait]
impl MarketDataSource for CsvObservationSource {
    async fn fetch(&self, symbols: &[String]) -> Result<Vec<Observation>, FetchError> {
        let all = self.read_all()?;
        let total = all.len();

        let observations: Vec<Observation> = all
            .into_iter()
            .filter(|o| symbols.iter().any(|s| s.eq_ignore_ascii_case(&o.symbol)))
            .collect();

        for symbol in symbols {
            if !observations.iter().any(|o| o.symbol.eq_ignore_ascii_case(symbol)) {
                warn!("No observations for {} in {}", symbol, self.path.display());
            }
        }

        if observations.is_empty() {
            return Err(FetchError::NoData(format!(
                "none of {:?} found in {}",
                symbols,
                self.path.display()
            )));
        }

        info!(
            "Loaded {} of {} observations from {}",
            observations.len(),
            total,
            self.path.display()
        );
        Ok(observations)
    }
}
