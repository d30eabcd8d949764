//! Pure arithmetic over observations: no I/O, fully deterministic.

pub mod classifier;
pub mod rollover;

pub use classifier::{categorize, categorize_pct, change_pct, DeltaClassifier};
pub use rollover::{expiry_delivery, rollover_pct, ExpiryDelivery};
