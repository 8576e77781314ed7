//! Per-(project, room type) rows and their comparison with the market.

use std::collections::BTreeMap;

use realty_dash_analytics_models::{
    ComparedRow, EngineSettings, MarketComparison, Metric, Row, RowQuery,
};
use realty_dash_market_models::{ApartmentTypeMetrics, Project, RoomKey};

use crate::baseline::compute_baseline;
use crate::deviation::compute_deviation;
use crate::sort::sort_rows;

/// Reads `metrics` for one apartment type of `project`.
///
/// Returns `None` when none of the requested metrics is defined; otherwise
/// the row carries exactly the defined subset.
#[must_use]
pub fn compute_row(
    project: &Project,
    room: &RoomKey,
    apartment: &ApartmentTypeMetrics,
    metrics: &[Metric],
    settings: &EngineSettings,
) -> Option<Row> {
    let values: BTreeMap<Metric, f64> = metrics
        .iter()
        .filter_map(|&metric| {
            metric
                .value(project, apartment, settings)
                .map(|v| (metric, v))
        })
        .collect();

    if values.is_empty() {
        return None;
    }

    Some(Row {
        project: project.jk_name.clone(),
        room: room.clone(),
        values,
    })
}

/// Builds the sorted rows for `query`, honoring its project and room
/// filters.
#[must_use]
pub fn build_rows(projects: &[Project], query: &RowQuery) -> Vec<Row> {
    let mut rows: Vec<Row> = projects
        .iter()
        .filter(|p| query.projects.matches(&p.jk_name))
        .flat_map(|project| {
            project
                .apartments()
                .into_iter()
                .filter(|(room, _)| query.rooms.matches(room))
                .filter_map(|(room, apartment)| {
                    compute_row(project, &room, apartment, &query.metrics, &query.settings)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    sort_rows(&mut rows);
    log::debug!(
        "built {} rows for {} metrics",
        rows.len(),
        query.metrics.len()
    );
    rows
}

/// Compares every row of `query` with the market baseline.
///
/// Baselines are taken over all projects under the query's room filter,
/// so narrowing the project selection changes which rows are shown but
/// not the market they are measured against.
#[must_use]
pub fn compare_to_market(projects: &[Project], query: &RowQuery) -> MarketComparison {
    let baselines: BTreeMap<Metric, Option<f64>> = query
        .metrics
        .iter()
        .map(|&metric| {
            (
                metric,
                compute_baseline(projects, metric, &query.rooms, &query.settings),
            )
        })
        .collect();

    let rows = build_rows(projects, query)
        .into_iter()
        .map(|row| {
            let deviations = baselines
                .iter()
                .map(|(&metric, &baseline)| (metric, compute_deviation(row.get(metric), baseline)))
                .collect();
            ComparedRow { row, deviations }
        })
        .collect();

    MarketComparison { baselines, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{project, with_area, with_prices};
    use realty_dash_analytics_models::{ProjectFilter, RoomFilter};
    use realty_dash_market_models::{ApartmentTypeMetrics, RoomType};

    #[test]
    fn rows_carry_only_defined_metrics() {
        let p = project("A", &[("studio", with_prices(25.0, 5.0, 200.0))]);
        let (room, apartment) = p.apartments().into_iter().next().unwrap();
        let row = compute_row(
            &p,
            &room,
            apartment,
            &[Metric::AverageArea, Metric::MonthlyPayment],
            &EngineSettings::default(),
        )
        .unwrap();

        assert_eq!(row.get(Metric::AverageArea), Some(25.0));
        assert_eq!(row.get(Metric::MonthlyPayment), None);
        assert_eq!(row.values.len(), 1);
    }

    #[test]
    fn no_defined_metric_means_no_row() {
        let p = project("A", &[("studio", ApartmentTypeMetrics::default())]);
        let rows = build_rows(&[p], &RowQuery::new([Metric::AverageSqmPrice]));
        assert!(rows.is_empty());
    }

    #[test]
    fn build_rows_applies_filters_and_sorts() {
        let projects = vec![
            project(
                "Beta",
                &[
                    ("2-room", with_area(Some(60.0))),
                    ("Studio", with_area(Some(24.0))),
                ],
            ),
            project("Alpha", &[("1-room", with_area(Some(38.0)))]),
        ];

        let rows = build_rows(&projects, &RowQuery::new([Metric::AverageArea]));
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.project.as_str(), r.room.as_str()))
            .collect();
        assert_eq!(
            keys,
            [("Alpha", "1-room"), ("Beta", "studio"), ("Beta", "2-room")]
        );

        let only_beta_studio = RowQuery::new([Metric::AverageArea])
            .with_projects(ProjectFilter::only(["Beta"]))
            .with_rooms(RoomFilter::only([RoomType::Studio]));
        let rows = build_rows(&projects, &only_beta_studio);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Metric::AverageArea), Some(24.0));
    }

    #[test]
    fn compare_to_market_example_scenario() {
        let projects = vec![
            project("A", &[("studio", with_area(Some(100.0)))]),
            project("B", &[("studio", with_area(Some(200.0)))]),
        ];
        let query = RowQuery::new([Metric::AverageArea])
            .with_rooms(RoomFilter::only([RoomType::Studio]));
        let comparison = compare_to_market(&projects, &query);

        assert_eq!(comparison.baseline(Metric::AverageArea), Some(150.0));
        let a = comparison.rows[0].deviation(Metric::AverageArea);
        let b = comparison.rows[1].deviation(Metric::AverageArea);
        assert_eq!(a.abs, Some(-50.0));
        assert!((a.pct.unwrap() + 33.33).abs() < 0.01);
        assert_eq!(b.abs, Some(50.0));
        assert!((b.pct.unwrap() - 33.33).abs() < 0.01);
    }

    #[test]
    fn undefined_market_yields_undefined_deviation() {
        let projects = vec![project("A", &[("studio", with_area(None))])];
        let comparison = compare_to_market(&projects, &RowQuery::new([Metric::AverageArea]));
        assert_eq!(comparison.baseline(Metric::AverageArea), None);
        assert!(comparison.rows.is_empty());

        let deviation = compute_deviation(None, comparison.baseline(Metric::AverageArea));
        assert_eq!(deviation.abs, None);
        assert_eq!(deviation.pct, None);
    }

    #[test]
    fn project_filter_does_not_move_the_market() {
        let projects = vec![
            project("A", &[("studio", with_area(Some(100.0)))]),
            project("B", &[("studio", with_area(Some(200.0)))]),
        ];
        let query =
            RowQuery::new([Metric::AverageArea]).with_projects(ProjectFilter::only(["A"]));
        let comparison = compare_to_market(&projects, &query);

        assert_eq!(comparison.rows.len(), 1);
        assert_eq!(comparison.baseline(Metric::AverageArea), Some(150.0));
    }

    #[test]
    fn empty_input_is_safe() {
        let comparison = compare_to_market(&[], &RowQuery::new([Metric::AverageArea]));
        assert!(comparison.rows.is_empty());
        assert_eq!(comparison.baseline(Metric::AverageArea), None);
    }
}
