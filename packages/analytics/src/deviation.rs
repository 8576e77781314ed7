//! Distance from the market baseline.

use realty_dash_analytics_models::Deviation;

/// Computes how far `value` sits from `baseline`.
///
/// `abs` is defined when both inputs are; `pct` additionally requires a
/// non-zero baseline. This is the only place deviation semantics live, and
/// it applies the same way to prices, areas and payments.
#[must_use]
pub fn compute_deviation(value: Option<f64>, baseline: Option<f64>) -> Deviation {
    let value = value.filter(|v| v.is_finite());
    let baseline = baseline.filter(|b| b.is_finite());

    let abs = match (value, baseline) {
        (Some(v), Some(b)) => Some(v - b),
        _ => None,
    };
    let pct = match (abs, baseline) {
        (Some(a), Some(b)) if b != 0.0 => Some(a / b * 100.0),
        _ => None,
    };

    Deviation { abs, pct }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deviation_above_and_below_market() {
        let below = compute_deviation(Some(100.0), Some(150.0));
        assert_eq!(below.abs, Some(-50.0));
        assert!((below.pct.unwrap() + 33.333_333).abs() < 1e-4);

        let above = compute_deviation(Some(200.0), Some(150.0));
        assert_eq!(above.abs, Some(50.0));
        assert!((above.pct.unwrap() - 33.333_333).abs() < 1e-4);
    }

    #[test]
    fn zero_baseline_has_no_percentage() {
        let d = compute_deviation(Some(10.0), Some(0.0));
        assert_eq!(d.abs, Some(10.0));
        assert_eq!(d.pct, None);
    }

    #[test]
    fn undefined_baseline_yields_nothing() {
        assert_eq!(compute_deviation(Some(10.0), None), Deviation::default());
    }

    #[test]
    fn undefined_value_yields_nothing() {
        assert_eq!(compute_deviation(None, Some(10.0)), Deviation::default());
        assert_eq!(
            compute_deviation(Some(f64::NAN), Some(10.0)),
            Deviation::default()
        );
    }
}
