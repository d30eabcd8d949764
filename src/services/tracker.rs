use super::appender::SchemaAppender;
use super::market_data::MarketDataSource;
use super::oi_analysis::{
    eod_summary_rows, expiry_delivery_rows, oi_log_rows, pair_by_symbol, rollover_rows,
};
use crate::analytics::DeltaClassifier;
use crate::error::{AppError, AppResult};
use crate::models::{CellValue, Observation, TableSchema};
use chrono::NaiveDate;
use std::sync::Arc;

/// One fetch, compute and append cycle per call
pub struct OiTracker {
    source: Arc<dyn MarketDataSource>,
    appender: SchemaAppender,
    classifier: DeltaClassifier,
    symbols: Vec<String>,
}

impl OiTracker {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        appender: SchemaAppender,
        classifier: DeltaClassifier,
        symbols: Vec<String>,
    ) -> Self {
        Self {
            source,
            appender,
            classifier,
            symbols,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    async fn observations(&self) -> AppResult<Vec<Observation>> {
        Ok(self.source.fetch(&self.symbols).await?)
    }

    async fn write(&self, schema: &TableSchema, rows: Vec<Vec<CellValue>>) -> AppResult<usize> {
        if rows.is_empty() {
            return Err(AppError::Validation(format!(
                "No rows could be computed for '{}'",
                schema.table()
            )));
        }
        self.appender.append(schema, &rows).await
    }

    /// Prior vs current classification per symbol into `EOD_Summary`
    pub async fn record_eod_summary(&self) -> AppResult<usize> {
        let observations = self.observations().await?;
        let pairs = pair_by_symbol(&observations);
        let rows = eod_summary_rows(&self.classifier, &pairs);
        self.write(&TableSchema::eod_summary(), rows).await
    }

    /// Latest snapshot per symbol into `OI_DailyLog`
    pub async fn record_oi_log(&self) -> AppResult<usize> {
        let observations = self.observations().await?;
        self.write(&TableSchema::oi_log(), oi_log_rows(&observations))
            .await
    }

    /// Near/far rollover per symbol into `Rollover`
    pub async fn record_rollover(&self) -> AppResult<usize> {
        let observations = self.observations().await?;
        self.write(&TableSchema::rollover(), rollover_rows(&observations))
            .await
    }

    /// Delivery proxy for contracts expiring on `expiry` into `Rollover_Analysis`
    pub async fn record_expiry_delivery(&self, expiry: NaiveDate) -> AppResult<usize> {
        let observations = self.observations().await?;
        self.write(
            &TableSchema::expiry_delivery(),
            expiry_delivery_rows(&observations, expiry),
        )
        .await
    }
}
