//! Changes over reporting periods.
//!
//! Snapshots record weekly and monthly change blocks plus 3- and 6-month
//! price lookbacks. Longer periods without recorded history are
//! extrapolated linearly from the monthly change (no compounding); such
//! values are flagged `estimated` so the presentation layer can mark them.

use realty_dash_analytics_models::{ChangeField, ChangePeriod, Period, PeriodChange};
use realty_dash_market_models::ApartmentTypeMetrics;

/// A recorded change.
#[must_use]
pub fn recorded(value: Option<f64>) -> PeriodChange {
    PeriodChange {
        value: value.filter(|v| v.is_finite()),
        estimated: false,
    }
}

/// Scales a shorter-period change linearly by `factor`.
#[must_use]
pub fn extrapolate(value: Option<f64>, factor: f64) -> PeriodChange {
    let value = value.filter(|v| v.is_finite()).map(|v| v * factor);
    PeriodChange {
        estimated: value.is_some(),
        value,
    }
}

/// Prefers `recorded` history; otherwise extrapolates `monthly` over
/// `months`.
#[must_use]
pub fn resolve_period_change(
    recorded_value: Option<f64>,
    monthly: Option<f64>,
    months: f64,
) -> PeriodChange {
    let history = recorded(recorded_value);
    if history.value.is_some() {
        history
    } else {
        extrapolate(monthly, months)
    }
}

/// Change of `field` for one apartment type over `period`.
///
/// Week and month read their change blocks directly. A quarter prefers
/// the recorded 3-month price change (for per-area prices) or the
/// quarterly block, and a half-year the recorded 6-month price change;
/// both otherwise fall back to the monthly change times 3 or 6.
#[must_use]
pub fn period_change(
    apartment: &ApartmentTypeMetrics,
    period: Period,
    field: ChangeField,
) -> PeriodChange {
    let read = |p: ChangePeriod| p.block(apartment).and_then(|b| field.read(b));
    let history = apartment.historical_sqm_prices.as_ref();
    let monthly = read(ChangePeriod::Monthly);

    match period {
        Period::Week => recorded(read(ChangePeriod::Weekly)),
        Period::Month => recorded(monthly),
        Period::Quarter => {
            let lookback = if field == ChangeField::SqmPricePct {
                history.and_then(|h| h.three_months_change_percent)
            } else {
                None
            };
            resolve_period_change(
                lookback.or_else(|| read(ChangePeriod::Quarterly)),
                monthly,
                3.0,
            )
        }
        Period::HalfYear => {
            let lookback = if field == ChangeField::SqmPricePct {
                history.and_then(|h| h.six_months_change_percent)
            } else {
                None
            };
            resolve_period_change(lookback, monthly, 6.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realty_dash_market_models::{ChangeBlock, HistoricalSqmPrices};

    fn apartment(monthly: Option<f64>, three: Option<f64>) -> ApartmentTypeMetrics {
        ApartmentTypeMetrics {
            weekly_change: Some(ChangeBlock {
                sqm_price_change_percent: Some(0.25),
                ..ChangeBlock::default()
            }),
            monthly_change: Some(ChangeBlock {
                sqm_price_change_percent: monthly,
                ..ChangeBlock::default()
            }),
            historical_sqm_prices: Some(HistoricalSqmPrices {
                three_months_change_percent: three,
                ..HistoricalSqmPrices::default()
            }),
            ..ApartmentTypeMetrics::default()
        }
    }

    #[test]
    fn recorded_quarter_wins_over_extrapolation() {
        let change = period_change(
            &apartment(Some(1.0), Some(2.5)),
            Period::Quarter,
            ChangeField::SqmPricePct,
        );
        assert_eq!(change.value, Some(2.5));
        assert!(!change.estimated);
    }

    #[test]
    fn quarter_falls_back_to_monthly_times_three() {
        let change = period_change(
            &apartment(Some(1.0), None),
            Period::Quarter,
            ChangeField::SqmPricePct,
        );
        assert_eq!(change.value, Some(3.0));
        assert!(change.estimated);
    }

    #[test]
    fn half_year_falls_back_to_monthly_times_six() {
        let change = period_change(
            &apartment(Some(-0.5), None),
            Period::HalfYear,
            ChangeField::SqmPricePct,
        );
        assert_eq!(change.value, Some(-3.0));
        assert!(change.estimated);
    }

    #[test]
    fn nothing_to_extrapolate_is_absent_not_estimated() {
        let change = period_change(
            &apartment(None, None),
            Period::HalfYear,
            ChangeField::SqmPricePct,
        );
        assert_eq!(change, PeriodChange::default());
    }

    #[test]
    fn week_and_month_read_their_blocks() {
        let a = apartment(Some(1.2), None);
        assert_eq!(
            period_change(&a, Period::Week, ChangeField::SqmPricePct).value,
            Some(0.25)
        );
        assert_eq!(
            period_change(&a, Period::Month, ChangeField::SqmPricePct).value,
            Some(1.2)
        );
        assert_eq!(
            period_change(&a, Period::Month, ChangeField::LotPricePct).value,
            None
        );
    }
}
