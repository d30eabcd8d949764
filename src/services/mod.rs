pub mod appender;
pub mod market_data;
pub mod oi_analysis;
pub mod tracker;

pub use appender::{HeaderStatus, SchemaAppender};
pub use market_data::{CsvObservationSource, MarketDataSource};
pub use tracker::OiTracker;
