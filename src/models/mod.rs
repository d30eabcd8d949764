//! Domain models.
//!
//! Observations come in from a market data source, delta results come out of
//! the classifier, and cells and schemas describe what lands in a table.

pub mod cell;
pub mod delta;
pub mod observation;
pub mod schema;

// Re-export all models for convenient access
pub use cell::CellValue;
pub use delta::{Annotation, Category, ChangePct, DeltaResult};
pub use observation::{Observation, ObservationPair};
pub use schema::{Column, ScalarKind, TableSchema};
