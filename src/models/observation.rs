use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A reading of one symbol at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    /// Contract expiry, for futures legs
    pub expiry: Option<NaiveDate>,
    pub open_interest: Option<u64>,
    pub price: Option<Decimal>,
}

impl Observation {
    /// Create a new Observation
    pub fn new(
        symbol: impl Into<String>,
        timestamp: NaiveDateTime,
        open_interest: Option<u64>,
        price: Option<Decimal>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            expiry: None,
            open_interest,
            price,
        }
    }

    /// Attach a contract expiry
    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Open interest as a float, for percentage arithmetic
    pub fn oi_f64(&self) -> Option<f64> {
        self.open_interest.map(|oi| oi as f64)
    }

    /// Price as a float, for percentage arithmetic
    pub fn price_f64(&self) -> Option<f64> {
        self.price.and_then(|p| p.to_f64())
    }

    /// Trading date of the reading
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Two observations of the same symbol at ordered points in time.
///
/// `prior`/`current` may equally be a near-expiry and a far-expiry leg.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationPair {
    prior: Observation,
    current: Observation,
}

impl ObservationPair {
    /// Pair two observations; fails if symbols differ or `current` precedes `prior`
    pub fn new(prior: Observation, current: Observation) -> Result<Self, String> {
        if prior.symbol != current.symbol {
            return Err(format!(
                "Cannot pair observations of different symbols: {} and {}",
                prior.symbol, current.symbol
            ));
        }
        if current.timestamp < prior.timestamp {
            return Err(format!(
                "Observations for {} are out of order: {} precedes {}",
                prior.symbol, current.timestamp, prior.timestamp
            ));
        }
        Ok(Self { prior, current })
    }

    pub fn symbol(&self) -> &str {
        &self.prior.symbol
    }

    pub fn prior(&self) -> &Observation {
        &self.prior
    }

    pub fn current(&self) -> &Observation {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_pair_requires_same_symbol() {
        let a = Observation::new("SBIN", at("2024-06-26"), Some(10), None);
        let b = Observation::new("PNB", at("2024-06-27"), Some(10), None);
        assert!(ObservationPair::new(a, b).is_err());
    }

    #[test]
    fn test_pair_requires_order() {
        let a = Observation::new("SBIN", at("2024-06-27"), Some(10), None);
        let b = Observation::new("SBIN", at("2024-06-26"), Some(10), None);
        assert!(ObservationPair::new(a, b).is_err());
    }

    #[test]
    fn test_pair_allows_equal_timestamps() {
        let near = Observation::new("SBIN", at("2024-06-27"), Some(10), None);
        let far = Observation::new("SBIN", at("2024-06-27"), Some(4), None);
        let pair = ObservationPair::new(near, far).unwrap();
        assert_eq!(pair.symbol(), "SBIN");
    }

    #[test]
    fn test_price_as_float() {
        let obs = Observation::new("SBIN", at("2024-06-27"), None, Some(Decimal::new(8425, 1)));
        assert_eq!(obs.price_f64(), Some(842.5));
        assert_eq!(obs.oi_f64(), None);
    }
}
