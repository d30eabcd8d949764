use crate::models::ChangePct;

/// Share of combined open interest sitting in the far contract, in percent.
///
/// A missing leg counts as zero OI; both missing, or a zero total, is not
/// computable.
pub fn rollover_pct(near_oi: Option<u64>, far_oi: Option<u64>) -> ChangePct {
    if near_oi.is_none() && far_oi.is_none() {
        return ChangePct::NotComputable;
    }
    let near = near_oi.unwrap_or(0) as f64;
    let far = far_oi.unwrap_or(0) as f64;
    let total = near + far;
    if total == 0.0 {
        return ChangePct::NotComputable;
    }
    ChangePct::from_f64(far / total * 100.0)
}

/// Delivery proxy for a contract that just expired
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpiryDelivery {
    /// OI that did not reappear in the next contract
    pub delivery_qty: Option<u64>,
    /// OI carried into the next contract, capped at 100
    pub rollover_pct: ChangePct,
    pub delivery_pct: ChangePct,
}

/// Compare OI on expiry day against the next contract's OI the following session
pub fn expiry_delivery(oi_on_expiry: Option<u64>, oi_next_day: Option<u64>) -> ExpiryDelivery {
    let (expiry, next) = match (oi_on_expiry, oi_next_day) {
        (Some(expiry), Some(next)) if expiry > 0 => (expiry, next),
        _ => {
            return ExpiryDelivery {
                delivery_qty: None,
                rollover_pct: ChangePct::NotComputable,
                delivery_pct: ChangePct::NotComputable,
            }
        }
    };

    let delivery_qty = expiry.saturating_sub(next);
    let carried = next.min(expiry);

    ExpiryDelivery {
        delivery_qty: Some(delivery_qty),
        rollover_pct: ChangePct::from_f64(carried as f64 / expiry as f64 * 100.0),
        delivery_pct: ChangePct::from_f64(delivery_qty as f64 / expiry as f64 * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollover_pct() {
        let pct = rollover_pct(Some(300), Some(700)).value().unwrap();
        assert!((pct - 70.0).abs() < 1e-9);
        assert_eq!(rollover_pct(Some(500), None).value(), Some(0.0));
        assert_eq!(rollover_pct(None, Some(500)).value(), Some(100.0));
    }

    #[test]
    fn test_rollover_pct_not_computable() {
        assert_eq!(rollover_pct(None, None), ChangePct::NotComputable);
        assert_eq!(rollover_pct(Some(0), Some(0)), ChangePct::NotComputable);
    }

    #[test]
    fn test_expiry_delivery() {
        let result = expiry_delivery(Some(1_000), Some(800));
        assert_eq!(result.delivery_qty, Some(200));
        assert!((result.rollover_pct.value().unwrap() - 80.0).abs() < 1e-9);
        assert!((result.delivery_pct.value().unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_expiry_delivery_growth_caps_rollover() {
        let result = expiry_delivery(Some(1_000), Some(1_500));
        assert_eq!(result.delivery_qty, Some(0));
        assert_eq!(result.rollover_pct.value(), Some(100.0));
        assert_eq!(result.delivery_pct.value(), Some(0.0));
    }

    #[test]
    fn test_expiry_delivery_zero_expiry_oi() {
        let result = expiry_delivery(Some(0), Some(10));
        assert_eq!(result.delivery_qty, None);
        assert!(!result.rollover_pct.is_defined());
        assert!(!expiry_delivery(None, Some(10)).delivery_pct.is_defined());
    }
}
