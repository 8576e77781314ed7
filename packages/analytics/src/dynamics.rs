//! Price dynamics of a single project.

use realty_dash_analytics_models::{ChangeField, DynamicsPoint, Period, PeriodChange, RoomChange};
use realty_dash_market_models::{PriceDynamicsPoint, Project};

use crate::periods::period_change;
use crate::stats::mean;

const MONTH_NAMES: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Russian name of a 1-based month number.
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(index).copied()
}

/// Change of `field` over `period` for each apartment type of `project`,
/// in canonical order. Types with nothing recorded or estimable are
/// skipped.
#[must_use]
pub fn average_change(project: &Project, period: Period, field: ChangeField) -> Vec<RoomChange> {
    project
        .apartments()
        .into_iter()
        .filter_map(|(room, apartment)| {
            let change = period_change(apartment, period, field);
            change.value.is_some().then_some(RoomChange { room, change })
        })
        .collect()
}

/// Mean change of `field` over `period` across the apartment types of
/// `project`. Estimated when any contributing type was estimated.
#[must_use]
pub fn overall_change(project: &Project, period: Period, field: ChangeField) -> PeriodChange {
    let changes = average_change(project, period, field);
    PeriodChange {
        value: mean(changes.iter().map(|c| c.change.value)),
        estimated: changes.iter().any(|c| c.change.estimated),
    }
}

fn label(key: &str, point: &PriceDynamicsPoint) -> String {
    let mut parts = key.split('-');
    let key_year = parts.next().and_then(|y| y.trim().parse::<i32>().ok());
    let key_month = parts.next().and_then(|m| m.trim().parse::<u32>().ok());

    let month = point.month.or(key_month).and_then(month_name);
    let year = point.year.or(key_year);

    match (month, year) {
        (Some(month), Some(year)) => format!("{month} {year}"),
        (Some(month), None) => month.to_string(),
        _ => key.to_string(),
    }
}

/// The last `last_n` months of the project's average price history that
/// carry a price, oldest first.
#[must_use]
pub fn price_dynamics_series(project: &Project, last_n: usize) -> Vec<DynamicsPoint> {
    let points: Vec<DynamicsPoint> = project
        .price_dynamics
        .iter()
        .flatten()
        .filter_map(|(key, point)| {
            let price = point.average_sqm_price_ths.filter(|v| v.is_finite())?;
            Some(DynamicsPoint {
                month: key.clone(),
                label: label(key, point),
                average_sqm_price: Some(price),
            })
        })
        .collect();

    let skip = points.len().saturating_sub(last_n);
    points.into_iter().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use realty_dash_market_models::{
        ApartmentTypeMetrics, ChangeBlock, HistoricalSqmPrices, RoomKey, RoomType,
    };

    use crate::test_support::project;

    fn monthly(pct: Option<f64>, three: Option<f64>) -> ApartmentTypeMetrics {
        ApartmentTypeMetrics {
            monthly_change: Some(ChangeBlock {
                sqm_price_change_percent: pct,
                ..ChangeBlock::default()
            }),
            historical_sqm_prices: three.map(|t| HistoricalSqmPrices {
                three_months_change_percent: Some(t),
                ..HistoricalSqmPrices::default()
            }),
            ..ApartmentTypeMetrics::default()
        }
    }

    #[test]
    fn average_change_per_room_and_overall() {
        let p = project(
            "A",
            &[
                ("studio", monthly(Some(1.0), Some(2.0))),
                ("1-room", monthly(Some(2.0), None)),
                ("2-room", monthly(None, None)),
            ],
        );

        let changes = average_change(&p, Period::Quarter, ChangeField::SqmPricePct);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].room, RoomKey::Known(RoomType::Studio));
        assert_eq!(changes[0].change.value, Some(2.0));
        assert!(!changes[0].change.estimated);
        assert_eq!(changes[1].change.value, Some(6.0));
        assert!(changes[1].change.estimated);

        let overall = overall_change(&p, Period::Quarter, ChangeField::SqmPricePct);
        assert_eq!(overall.value, Some(4.0));
        assert!(overall.estimated);

        let month = overall_change(&p, Period::Month, ChangeField::SqmPricePct);
        assert_eq!(month.value, Some(1.5));
        assert!(!month.estimated);
    }

    #[test]
    fn overall_change_of_empty_project_is_absent() {
        assert_eq!(
            overall_change(&Project::default(), Period::Week, ChangeField::SqmPricePct),
            PeriodChange::default()
        );
    }

    #[test]
    fn series_keeps_last_months_with_labels() {
        let mut dynamics = BTreeMap::new();
        for (key, price) in [
            ("2025-01", Some(170.0)),
            ("2025-02", None),
            ("2025-03", Some(172.0)),
            ("2025-04", Some(175.5)),
        ] {
            dynamics.insert(
                key.to_string(),
                PriceDynamicsPoint {
                    average_sqm_price_ths: price,
                    ..PriceDynamicsPoint::default()
                },
            );
        }
        let p = Project {
            price_dynamics: Some(dynamics),
            ..Project::default()
        };

        let series = price_dynamics_series(&p, 2);
        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Март 2025", "Апрель 2025"]);
        assert_eq!(series[1].average_sqm_price, Some(175.5));

        assert_eq!(price_dynamics_series(&p, 10).len(), 3);
        assert!(price_dynamics_series(&Project::default(), 4).is_empty());
    }

    #[test]
    fn explicit_year_and_month_win_over_key() {
        let point = PriceDynamicsPoint {
            year: Some(2024),
            month: Some(12),
            average_sqm_price_ths: Some(1.0),
        };
        assert_eq!(label("2025-01", &point), "Декабрь 2024");
        assert_eq!(label("latest", &PriceDynamicsPoint::default()), "latest");
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
