use serde::{Deserialize, Serialize};
use std::fmt;

/// A signed percentage change, or the explicit absence of one.
///
/// `Defined` never holds `inf` or `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChangePct {
    Defined(f64),
    NotComputable,
}

impl ChangePct {
    /// Wrap a float, mapping non-finite values to `NotComputable`
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            ChangePct::Defined(value)
        } else {
            ChangePct::NotComputable
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ChangePct::Defined(v) => Some(*v),
            ChangePct::NotComputable => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, ChangePct::Defined(_))
    }

    /// Strictly positive
    pub fn is_up(&self) -> bool {
        self.value().is_some_and(|v| v > 0.0)
    }

    /// Strictly negative
    pub fn is_down(&self) -> bool {
        self.value().is_some_and(|v| v < 0.0)
    }
}

impl From<Option<f64>> for ChangePct {
    fn from(value: Option<f64>) -> Self {
        value.map(ChangePct::from_f64).unwrap_or(ChangePct::NotComputable)
    }
}

/// Buildup/unwinding category from the joint direction of price and OI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    LongBuildup,
    ShortBuildup,
    ShortCovering,
    LongUnwinding,
    Neutral,
}

impl Category {
    /// Label written to tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::LongBuildup => "Long Buildup",
            Category::ShortBuildup => "Short Buildup",
            Category::ShortCovering => "Short Covering",
            Category::LongUnwinding => "Long Unwinding",
            Category::Neutral => "Neutral",
        }
    }

    /// Parse a label read back from a table
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "long buildup" => Ok(Category::LongBuildup),
            "short buildup" => Ok(Category::ShortBuildup),
            "short covering" => Ok(Category::ShortCovering),
            "long unwinding" => Ok(Category::LongUnwinding),
            "neutral" | "neutral / unclear" => Ok(Category::Neutral),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Additive tags emitted alongside the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Annotation {
    OiSpike,
    Divergence,
}

impl Annotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Annotation::OiSpike => "OI Spike",
            Annotation::Divergence => "Divergence Detected",
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one observation pair
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaResult {
    pub oi_change: ChangePct,
    pub price_change: ChangePct,
    pub category: Category,
    pub annotations: Vec<Annotation>,
}

impl DeltaResult {
    /// Annotations joined for a single table cell; empty when there are none
    pub fn annotation_label(&self) -> String {
        self.annotations
            .iter()
            .map(Annotation::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_is_not_computable() {
        assert_eq!(ChangePct::from_f64(f64::INFINITY), ChangePct::NotComputable);
        assert_eq!(ChangePct::from_f64(f64::NAN), ChangePct::NotComputable);
        assert_eq!(ChangePct::from(None), ChangePct::NotComputable);
    }

    #[test]
    fn test_zero_is_neither_up_nor_down() {
        let zero = ChangePct::Defined(0.0);
        assert!(!zero.is_up());
        assert!(!zero.is_down());
        assert!(zero.is_defined());
    }

    #[test]
    fn test_category_conversion() {
        for category in [
            Category::LongBuildup,
            Category::ShortBuildup,
            Category::ShortCovering,
            Category::LongUnwinding,
            Category::Neutral,
        ] {
            assert_eq!(Category::from_str(category.as_str()).unwrap(), category);
        }
        assert_eq!(
            Category::from_str("Neutral / Unclear").unwrap(),
            Category::Neutral
        );
        assert!(Category::from_str("Sideways").is_err());
    }

    #[test]
    fn test_annotation_label() {
        let result = DeltaResult {
            oi_change: ChangePct::Defined(25.0),
            price_change: ChangePct::Defined(-3.0),
            category: Category::ShortBuildup,
            annotations: vec![Annotation::OiSpike, Annotation::Divergence],
        };
        assert_eq!(result.annotation_label(), "OI Spike, Divergence Detected");
    }
}
