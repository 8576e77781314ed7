//! Price forecasts: one table per forecast month and a trend chart with
//! the pessimistic and optimistic bounds.

use realty_dash_analytics::stats::mean;
use realty_dash_analytics::{forecast_months, forecast_rows};
use realty_dash_analytics_models::{ForecastPoint, ForecastRow, Metric};
use realty_dash_market_models::RootData;

use super::{Kpi, ReportView, grouped_table, room_cell};
use crate::chart::{ChartData, ChartKind};
use crate::state::DashboardState;
use crate::table::{Cell, Column, Table};

fn point<'a>(row: &'a ForecastRow, month: &str) -> Option<&'a ForecastPoint> {
    row.predictions.iter().find(|p| p.month == month)
}

fn month_label(rows: &[ForecastRow], month: &str) -> String {
    rows.iter()
        .find_map(|r| point(r, month))
        .map_or_else(|| month.to_string(), |p| p.label.clone())
}

fn month_table(rows: &[ForecastRow], month: &str, title: &str, state: &DashboardState) -> Table {
    let columns = vec![
        Column::text("ЖК"),
        Column::text("Тип"),
        Column::number("Цена м², тыс."),
        Column::number("Пессимистичный"),
        Column::number("Оптимистичный"),
        Column::number("Цена лота, млн"),
        Column::number("Рост, %"),
        Column::number("Точность, %"),
    ];
    let in_month: Vec<ForecastRow> = rows
        .iter()
        .filter(|r| point(r, month).is_some())
        .cloned()
        .collect();

    let mut table = grouped_table(
        title,
        columns,
        in_month,
        |row: &ForecastRow| {
            let p = point(row, month);
            vec![
                room_cell(&row.room),
                Cell::number(p.and_then(|p| p.sqm_price), 1),
                Cell::number(p.and_then(|p| p.sqm_price_pessimistic), 1),
                Cell::number(p.and_then(|p| p.sqm_price_optimistic), 1),
                Cell::number(p.and_then(|p| p.lot_price), 2),
                Cell::delta(p.and_then(|p| p.growth_percent)),
                Cell::number(p.and_then(|p| p.accuracy_percent), 0),
            ]
        },
    );
    table.apply_gradient(6);
    table.retain_expanded(&state.expanded);
    table
}

/// Mean of `value` over the points of `month`, `0` when none define it.
fn monthly_mean(
    rows: &[ForecastRow],
    months: &[String],
    value: impl Fn(&ForecastPoint) -> Option<f64>,
) -> Vec<f64> {
    months
        .iter()
        .map(|month| {
            mean(rows.iter().filter_map(|r| point(r, month)).map(&value)).unwrap_or(0.0)
        })
        .collect()
}

fn trend_chart(rows: &[ForecastRow], title: &str) -> ChartData {
    let months = forecast_months(rows);
    let labels = months.iter().map(|m| month_label(rows, m)).collect();

    ChartData::new(ChartKind::Line, title, labels)
        .with_dataset(
            "Цена м², тыс.",
            monthly_mean(rows, &months, |p| p.sqm_price),
        )
        .with_dashed_dataset(
            "Пессимистичный",
            monthly_mean(rows, &months, |p| p.sqm_price_pessimistic),
            0,
        )
        .with_dashed_dataset(
            "Оптимистичный",
            monthly_mean(rows, &months, |p| p.sqm_price_optimistic),
            0,
        )
}

pub(super) fn render(report: &mut ReportView, data: &RootData, state: &DashboardState) {
    let rows = forecast_rows(&data.projects, &state.query(Vec::<Metric>::new()));
    let months = forecast_months(&rows);
    log::debug!("forecast: {} rows over {} months", rows.len(), months.len());

    let nearest = months.first().map(String::as_str);
    let nearest_points: Vec<&ForecastPoint> = nearest
        .map(|m| rows.iter().filter_map(|r| point(r, m)).collect())
        .unwrap_or_default();

    report.kpis = vec![
        Kpi::change(
            "Ожидаемый рост цены м²",
            mean(nearest_points.iter().map(|p| p.growth_percent)),
        ),
        Kpi::new(
            "Точность прогноза, %",
            mean(nearest_points.iter().map(|p| p.accuracy_percent)),
            0,
        ),
        Kpi::new(
            "Прогнозная цена м², тыс.",
            mean(nearest_points.iter().map(|p| p.sqm_price)),
            1,
        ),
    ];

    if months.is_empty() {
        report.tables.push(month_table(&rows, "", "Прогноз цен", state));
    }
    for month in &months {
        let title = format!("Прогноз на {}", month_label(&rows, month));
        report.tables.push(month_table(&rows, month, &title, state));
    }

    // The chart follows the selected project when there is one.
    let selected = state.selected(data).ok().flatten().map(|p| p.jk_name.as_str());
    let (chart_rows, title): (Vec<ForecastRow>, String) = match selected {
        Some(name) => (
            rows.iter().filter(|r| r.project == name).cloned().collect(),
            format!("Прогноз цены м², {name}"),
        ),
        None => (rows, "Прогноз цены м²".to_string()),
    };
    report.charts.push(trend_chart(&chart_rows, &title));
}

#[cfg(test)]
mod tests {
    use super::super::View;
    use super::super::test_support::snapshot;
    use super::*;
    use crate::table::RowKind;

    #[test]
    fn one_table_per_month_and_a_bounded_trend() {
        let data = snapshot();
        let mut state = DashboardState::new(&data);
        state.expanded.expand_all(data.project_names());

        let mut report = ReportView::new(View::Forecast);
        render(&mut report, &data, &state);

        assert_eq!(report.tables.len(), 1);
        let table = &report.tables[0];
        assert_eq!(table.title, "Прогноз на Май 2025");
        let item = table.rows.iter().find(|r| r.kind == RowKind::Item).unwrap();
        assert_eq!(item.cells[1].text, "Студия");
        assert_eq!(item.cells[2].value, Some(305.0));
        assert_eq!(item.cells[6].text, "+1,70%");

        assert_eq!(report.kpis[0].value, "+1,70%");
        assert_eq!(report.kpis[1].value, "82");

        let chart = &report.charts[0];
        assert_eq!(chart.labels, ["Май 2025"]);
        assert_eq!(chart.datasets[0].values, [305.0]);
        assert_eq!(chart.datasets[1].values, [298.0]);
        assert!(chart.datasets[2].style.dashed);
    }

    #[test]
    fn no_forecasts_still_yield_a_table() {
        let data = snapshot();
        let mut state = DashboardState::new(&data);
        state.projects = realty_dash_analytics_models::ProjectFilter::only(["Азимут"]);

        let mut report = ReportView::new(View::Forecast);
        render(&mut report, &data, &state);

        assert_eq!(report.tables.len(), 1);
        assert!(report.tables[0].is_empty());
        assert_eq!(report.kpis[0].value, "—");
    }
}
