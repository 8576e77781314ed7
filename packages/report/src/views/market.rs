//! Market overview: price, area and payment ranges of every project.

use realty_dash_analytics::build_rows;
use realty_dash_analytics::stats::{sum, summarize};
use realty_dash_analytics_models::{Metric, Row};
use realty_dash_market_models::RootData;

use super::{Kpi, ReportView, column, grouped_table, room_cell};
use crate::chart::{ChartData, ChartKind, to_chart_series};
use crate::state::DashboardState;
use crate::table::{Cell, Column};

/// Table columns after project and type, with their digits.
const COLUMNS: &[(Metric, usize)] = &[
    (Metric::ApartmentCount, 0),
    (Metric::MinSqmPrice, 1),
    (Metric::AverageSqmPrice, 1),
    (Metric::MaxSqmPrice, 1),
    (Metric::MinArea, 1),
    (Metric::AverageArea, 1),
    (Metric::MaxArea, 1),
    (Metric::MinLotPrice, 2),
    (Metric::AverageLotPrice, 2),
    (Metric::MaxLotPrice, 2),
    (Metric::MonthlyPayment, 1),
];

/// Position of the average price per m² column, counting the project and
/// type columns.
const AVERAGE_SQM_COLUMN: usize = 4;

pub(super) fn render(report: &mut ReportView, data: &RootData, state: &DashboardState) {
    let metrics: Vec<Metric> = COLUMNS.iter().map(|(m, _)| *m).collect();
    let rows = build_rows(&data.projects, &state.query(metrics));

    let sqm = summarize(column(&rows, Metric::AverageSqmPrice));
    report.kpis = vec![
        Kpi::new("Средняя цена м², тыс.", sqm.map(|s| s.mean), 1),
        Kpi::new(
            "Мин. цена м², тыс.",
            summarize(column(&rows, Metric::MinSqmPrice)).map(|s| s.min),
            1,
        ),
        Kpi::new(
            "Макс. цена м², тыс.",
            summarize(column(&rows, Metric::MaxSqmPrice)).map(|s| s.max),
            1,
        ),
        Kpi::new(
            "Средняя площадь, м²",
            summarize(column(&rows, Metric::AverageArea)).map(|s| s.mean),
            1,
        ),
        Kpi::new(
            "Средняя цена лота, млн",
            summarize(column(&rows, Metric::AverageLotPrice)).map(|s| s.mean),
            2,
        ),
        Kpi::new("Лотов в продаже, шт.", sum(column(&rows, Metric::ApartmentCount)), 0),
    ];

    let mut columns = vec![Column::text("ЖК"), Column::text("Тип")];
    columns.extend(COLUMNS.iter().map(|(m, _)| Column::number(m.label())));

    let mut table = grouped_table("Параметры рынка", columns, rows.clone(), |row: &Row| {
        let mut cells = vec![room_cell(&row.room)];
        cells.extend(
            COLUMNS
                .iter()
                .map(|&(metric, digits)| Cell::number(row.get(metric), digits)),
        );
        cells
    });
    table.highlight_extremes(AVERAGE_SQM_COLUMN);
    table.retain_expanded(&state.expanded);
    report.tables.push(table);

    let series = to_chart_series(&rows, Metric::AverageSqmPrice);
    report.charts.push(
        ChartData::new(ChartKind::Bar, "Средняя цена м², тыс. руб.", series.labels)
            .with_dataset(Metric::AverageSqmPrice.label(), series.values),
    );
}
