//! Mortgage payment history.
//!
//! Snapshots only carry a two-week payment delta. A month is taken as two
//! such intervals; quarter and half-year deltas scale the monthly delta by
//! 1.5 and 3. These are rough estimates, not recorded history.

use realty_dash_analytics_models::{Deviation, EngineSettings, Metric, PaymentHistory};
use realty_dash_market_models::{ApartmentTypeMetrics, Project};

use crate::periods::extrapolate;

/// Two-week intervals in a month.
const MONTH_FACTOR: f64 = 2.0;
/// A quarter's change is taken as 1.5 monthly changes.
const QUARTER_FACTOR: f64 = MONTH_FACTOR * 1.5;
/// A half-year's change is taken as 3 monthly changes.
const HALF_YEAR_FACTOR: f64 = MONTH_FACTOR * 3.0;

fn scaled(abs: Option<f64>, pct: Option<f64>, factor: f64) -> Deviation {
    Deviation {
        abs: extrapolate(abs, factor).value,
        pct: extrapolate(pct, factor).value,
    }
}

/// Down payment in millions of roubles: the average lot price times the
/// project's down payment share.
#[must_use]
pub fn down_payment(
    project: &Project,
    apartment: &ApartmentTypeMetrics,
    settings: &EngineSettings,
) -> Option<f64> {
    Metric::DownPayment.value(project, apartment, settings)
}

/// Current payment and its estimated change over a month, quarter and
/// half-year.
#[must_use]
pub fn payment_history(apartment: &ApartmentTypeMetrics) -> PaymentHistory {
    let Some(mortgage) = apartment.mortgage_calculation.as_ref() else {
        return PaymentHistory::default();
    };

    let current = mortgage
        .current_monthly_payment_ths
        .filter(|v| v.is_finite());
    let biweekly = mortgage.biweekly_change.as_ref();
    let abs = biweekly.and_then(|c| c.absolute_change_ths);
    let pct = biweekly.and_then(|c| c.percent_change);

    let month = scaled(abs, pct, MONTH_FACTOR);
    let month_ago = match (current, month.abs) {
        (Some(now), Some(delta)) => Some(now - delta),
        _ => None,
    };

    PaymentHistory {
        current,
        month_ago,
        month,
        quarter: scaled(abs, pct, QUARTER_FACTOR),
        half_year: scaled(abs, pct, HALF_YEAR_FACTOR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_prices;
    use realty_dash_market_models::{MortgageCalculation, MortgageConfig, PaymentChange};

    fn apartment(change: Option<PaymentChange>) -> ApartmentTypeMetrics {
        ApartmentTypeMetrics {
            mortgage_calculation: Some(MortgageCalculation {
                current_monthly_payment_ths: Some(100.0),
                biweekly_change: change,
                ..MortgageCalculation::default()
            }),
            ..ApartmentTypeMetrics::default()
        }
    }

    #[test]
    fn scales_biweekly_change() {
        let history = payment_history(&apartment(Some(PaymentChange {
            percent_change: Some(0.5),
            absolute_change_ths: Some(1.0),
        })));

        assert_eq!(history.current, Some(100.0));
        assert_eq!(history.month.abs, Some(2.0));
        assert_eq!(history.month.pct, Some(1.0));
        assert_eq!(history.month_ago, Some(98.0));
        assert_eq!(history.quarter.abs, Some(3.0));
        assert_eq!(history.half_year.pct, Some(3.0));
    }

    #[test]
    fn longer_periods_scale_the_monthly_change() {
        let history = payment_history(&apartment(Some(PaymentChange {
            percent_change: Some(0.4),
            absolute_change_ths: Some(2.0),
        })));

        let month = history.month.abs.unwrap();
        assert!((history.quarter.abs.unwrap() - month * 1.5).abs() < 1e-9);
        assert!((history.half_year.abs.unwrap() - month * 3.0).abs() < 1e-9);
        assert!((history.quarter.pct.unwrap() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn missing_change_is_not_zero() {
        let history = payment_history(&apartment(None));
        assert_eq!(history.current, Some(100.0));
        assert_eq!(history.month_ago, None);
        assert_eq!(history.month, Deviation::default());
        assert_eq!(history.half_year, Deviation::default());
    }

    #[test]
    fn no_mortgage_block_is_all_absent() {
        assert_eq!(
            payment_history(&ApartmentTypeMetrics::default()),
            PaymentHistory::default()
        );
    }

    #[test]
    fn down_payment_uses_project_share() {
        let apartment = with_prices(40.0, 10.0, 250.0);
        let mut project = Project::default();
        let settings = EngineSettings::default();
        assert_eq!(down_payment(&project, &apartment, &settings), Some(3.0));

        project.mortgage_config = Some(MortgageConfig {
            down_payment_percent: Some(20.0),
        });
        assert_eq!(down_payment(&project, &apartment, &settings), Some(2.0));
        assert_eq!(
            down_payment(&project, &ApartmentTypeMetrics::default(), &settings),
            None
        );
    }
}
