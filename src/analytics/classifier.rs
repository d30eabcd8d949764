use crate::config::ClassifierConfig;
use crate::models::{Annotation, Category, ChangePct, DeltaResult, ObservationPair};
use tracing::debug;

/// Percentage change from `prior` to `current`.
///
/// `(current - prior) / prior * 100`. A zero or missing prior, or a missing
/// current, is not computable.
pub fn change_pct(prior: Option<f64>, current: Option<f64>) -> ChangePct {
    match (prior, current) {
        (Some(prior), Some(current)) if prior != 0.0 => {
            ChangePct::from_f64((current - prior) / prior * 100.0)
        }
        _ => ChangePct::NotComputable,
    }
}

/// Category from the signs of the price and OI changes.
///
/// A change of exactly zero, or one that is not computable, is neither up
/// nor down and lands in `Neutral`.
pub fn categorize(price_change: ChangePct, oi_change: ChangePct) -> Category {
    match (
        price_change.is_up(),
        price_change.is_down(),
        oi_change.is_up(),
        oi_change.is_down(),
    ) {
        (true, _, true, _) => Category::LongBuildup,
        (_, true, true, _) => Category::ShortBuildup,
        (true, _, _, true) => Category::ShortCovering,
        (_, true, _, true) => Category::LongUnwinding,
        _ => Category::Neutral,
    }
}

/// Float convenience over [`categorize`]
pub fn categorize_pct(price_change_pct: f64, oi_change_pct: f64) -> Category {
    categorize(
        ChangePct::from_f64(price_change_pct),
        ChangePct::from_f64(oi_change_pct),
    )
}

/// Classifier carrying the annotation thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaClassifier {
    config: ClassifierConfig,
}

impl DeltaClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Secondary tags for a pair of changes
    ///
    /// - `OiSpike` when `|oi change|` exceeds the spike threshold.
    /// - `Divergence` when price and OI move in strictly opposite directions
    ///   and their spread in percentage points exceeds the divergence
    ///   threshold.
    pub fn annotate(&self, price_change: ChangePct, oi_change: ChangePct) -> Vec<Annotation> {
        let mut annotations = Vec::new();

        if let Some(oi) = oi_change.value() {
            if oi.abs() > self.config.oi_spike_threshold_pct {
                annotations.push(Annotation::OiSpike);
            }
        }

        if let (Some(price), Some(oi)) = (price_change.value(), oi_change.value()) {
            let opposing = (price > 0.0 && oi < 0.0) || (price < 0.0 && oi > 0.0);
            if opposing && (price - oi).abs() > self.config.price_divergence_threshold_pct {
                annotations.push(Annotation::Divergence);
            }
        }

        annotations
    }

    /// Classify already computed changes
    pub fn classify_changes(&self, price_change: ChangePct, oi_change: ChangePct) -> DeltaResult {
        DeltaResult {
            oi_change,
            price_change,
            category: categorize(price_change, oi_change),
            annotations: self.annotate(price_change, oi_change),
        }
    }

    /// Classify the move between the two observations of a pair
    pub fn classify_pair(&self, pair: &ObservationPair) -> DeltaResult {
        let oi_change = change_pct(pair.prior().oi_f64(), pair.current().oi_f64());
        let price_change = change_pct(pair.prior().price_f64(), pair.current().price_f64());
        let result = self.classify_changes(price_change, oi_change);

        debug!(
            "{}: oi {:?}, price {:?} -> {}",
            pair.symbol(),
            result.oi_change,
            result.price_change,
            result.category
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn pct(v: f64) -> ChangePct {
        ChangePct::Defined(v)
    }

    #[test]
    fn test_change_pct_formula() {
        let result = change_pct(Some(1_000_000.0), Some(1_200_000.0));
        assert!((result.value().unwrap() - 20.0).abs() < 1e-9);

        let result = change_pct(Some(100.0), Some(95.5));
        assert!((result.value().unwrap() - (-4.5)).abs() < 1e-9);
    }

    #[test]
    fn test_change_pct_not_computable() {
        assert_eq!(change_pct(Some(0.0), Some(10.0)), ChangePct::NotComputable);
        assert_eq!(change_pct(None, Some(10.0)), ChangePct::NotComputable);
        assert_eq!(change_pct(Some(10.0), None), ChangePct::NotComputable);
    }

    #[test]
    fn test_categorize_table() {
        assert_eq!(categorize_pct(5.0, 3.0), Category::LongBuildup);
        assert_eq!(categorize_pct(-5.0, 3.0), Category::ShortBuildup);
        assert_eq!(categorize_pct(5.0, -3.0), Category::ShortCovering);
        assert_eq!(categorize_pct(-5.0, -3.0), Category::LongUnwinding);
        assert_eq!(categorize_pct(0.0, 0.0), Category::Neutral);
    }

    #[test]
    fn test_categorize_zero_or_undefined_is_neutral() {
        assert_eq!(categorize_pct(5.0, 0.0), Category::Neutral);
        assert_eq!(categorize_pct(0.0, -3.0), Category::Neutral);
        assert_eq!(
            categorize(ChangePct::NotComputable, pct(3.0)),
            Category::Neutral
        );
    }

    #[test]
    fn test_oi_spike_threshold_is_strict() {
        let classifier = DeltaClassifier::default();
        assert!(classifier.annotate(pct(1.0), pct(20.0)).is_empty());
        assert_eq!(
            classifier.annotate(pct(1.0), pct(-20.5)),
            vec![Annotation::OiSpike]
        );
    }

    #[test]
    fn test_divergence_needs_opposing_moves() {
        let classifier = DeltaClassifier::default();
        assert_eq!(
            classifier.annotate(pct(-6.0), pct(5.0)),
            vec![Annotation::Divergence]
        );
        // same direction, large spread
        assert!(classifier.annotate(pct(1.0), pct(15.0)).is_empty());
        // opposing but narrow
        assert!(classifier.annotate(pct(-2.0), pct(3.0)).is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = DeltaClassifier::new(ClassifierConfig {
            oi_spike_threshold_pct: 5.0,
            price_divergence_threshold_pct: 1.0,
        });
        assert_eq!(
            classifier.annotate(pct(-2.0), pct(6.0)),
            vec![Annotation::OiSpike, Annotation::Divergence]
        );
    }

    #[test]
    fn test_classify_pair_long_buildup() {
        let day = |d: u32| {
            NaiveDate::from_ymd_opt(2024, 6, d)
                .unwrap()
                .and_hms_opt(15, 30, 0)
                .unwrap()
        };
        let prior = Observation::new("BANKNIFTY", day(26), Some(1_000_000), Some(Decimal::new(100, 0)));
        let current = Observation::new("BANKNIFTY", day(27), Some(1_200_000), Some(Decimal::new(105, 0)));
        let pair = ObservationPair::new(prior, current).unwrap();

        let result = DeltaClassifier::default().classify_pair(&pair);

        assert!((result.oi_change.value().unwrap() - 20.0).abs() < 1e-9);
        assert!((result.price_change.value().unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(result.category, Category::LongBuildup);
        assert!(result.annotations.is_empty());
    }
}
