//! Price forecasts per `(project, room type)`.

use realty_dash_analytics_models::{ForecastPoint, ForecastRow, RowQuery};
use realty_dash_market_models::{ForecastMonth, Project};

use crate::sort::compare_keys;

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

fn point(month: &str, forecast: &ForecastMonth) -> ForecastPoint {
    let lot_range = forecast.predicted_lot_price_range_mln.as_ref();
    let sqm_range = forecast.predicted_sqm_price_range_ths.as_ref();

    ForecastPoint {
        month: month.to_string(),
        label: forecast
            .month_label
            .clone()
            .unwrap_or_else(|| month.to_string()),
        lot_price: finite(forecast.average_predicted_lot_price_mln),
        lot_price_pessimistic: finite(lot_range.and_then(|r| r.pessimistic)),
        lot_price_optimistic: finite(lot_range.and_then(|r| r.optimistic)),
        sqm_price: finite(forecast.average_predicted_sqm_price_ths),
        sqm_price_pessimistic: finite(sqm_range.and_then(|r| r.pessimistic)),
        sqm_price_optimistic: finite(sqm_range.and_then(|r| r.optimistic)),
        growth_percent: finite(forecast.expected_growth_percent),
        accuracy_percent: finite(forecast.prediction_accuracy_percent),
    }
}

/// Forecast rows for the projects and room types selected by `query`.
///
/// Predictions within a row are ordered by month key; pairs without any
/// prediction are skipped.
#[must_use]
pub fn forecast_rows(projects: &[Project], query: &RowQuery) -> Vec<ForecastRow> {
    let mut rows: Vec<ForecastRow> = projects
        .iter()
        .filter(|p| query.projects.matches(&p.jk_name))
        .flat_map(|project| {
            project
                .apartments()
                .into_iter()
                .filter(|(room, _)| query.rooms.matches(room))
                .filter_map(|(room, apartment)| {
                    let predictions = apartment.price_prediction.as_ref()?;
                    // BTreeMap iteration keeps month keys sorted.
                    let points: Vec<ForecastPoint> = predictions
                        .iter()
                        .map(|(month, forecast)| point(month, forecast))
                        .collect();
                    (!points.is_empty()).then(|| ForecastRow {
                        project: project.jk_name.clone(),
                        room,
                        predictions: points,
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect();

    rows.sort_by(|a, b| compare_keys((&a.project, &a.room), (&b.project, &b.room)));
    rows
}

/// Every month key that appears in any row, in order.
#[must_use]
pub fn forecast_months(rows: &[ForecastRow]) -> Vec<String> {
    let mut months: Vec<String> = rows
        .iter()
        .flat_map(|r| r.predictions.iter().map(|p| p.month.clone()))
        .collect();
    months.sort();
    months.dedup();
    months
}
