//! OI Tracker Library
//!
//! Classifies futures open-interest and price moves and appends the results
//! to tables whose header row is reconciled before every write.

pub mod analytics;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use analytics::DeltaClassifier;
use models::TableSchema;
use services::{HeaderStatus, MarketDataSource, OiTracker, SchemaAppender};
use std::sync::Arc;
use store::TableStore;

/// Wire a tracker from configuration and already-opened collaborators
pub fn build_tracker(
    config: &AppConfig,
    source: Arc<dyn MarketDataSource>,
    store: Arc<dyn TableStore>,
) -> OiTracker {
    let appender = SchemaAppender::new(store).with_policy(config.store.mismatch_policy);
    OiTracker::new(
        source,
        appender,
        DeltaClassifier::new(config.classifier),
        config.symbols.clone(),
    )
}

/// Reconcile the header of every predefined table without appending
pub async fn init_tables(
    config: &AppConfig,
    store: Arc<dyn TableStore>,
) -> AppResult<Vec<(String, HeaderStatus)>> {
    SchemaAppender::new(store)
        .with_policy(config.store.mismatch_policy)
        .ensure_schemas(&TableSchema::all())
        .await
}
