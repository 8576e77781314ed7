//! Competitive analysis: every row against the market baseline ("KO").

use realty_dash_analytics::{baselines_by_room_type, compare_to_market, room_types};
use realty_dash_analytics_models::{ComparedRow, Metric};
use realty_dash_market_models::RootData;

use super::{Kpi, ReportView, grouped_table, room_cell};
use crate::chart::{ChartData, ChartKind, row_label};
use crate::state::DashboardState;
use crate::table::{Cell, Column, Table};

/// Metrics compared with the baseline, with their digits.
const COMPARED: &[(Metric, usize)] = &[
    (Metric::AverageArea, 1),
    (Metric::AverageLotPrice, 2),
    (Metric::AverageSqmPrice, 1),
];

/// Price history shown after the deviations.
const HISTORY: &[Metric] = &[
    Metric::SqmPriceOneMonthAgo,
    Metric::SqmPriceThreeMonthsAgo,
    Metric::SqmPriceSixMonthsAgo,
    Metric::SqmPriceOneMonthChangePct,
    Metric::SqmPriceThreeMonthsChangePct,
    Metric::SqmPriceSixMonthsChangePct,
];

/// Columns holding a deviation in percent.
const DEVIATION_COLUMNS: &[usize] = &[3, 5, 7];

/// Column holding the absolute price per m² deviation.
const SQM_ABS_COLUMN: usize = 8;

fn cells(row: &ComparedRow) -> Vec<Cell> {
    let mut cells = vec![room_cell(&row.row.room)];
    for &(metric, digits) in COMPARED {
        cells.push(Cell::number(row.row.get(metric), digits));
        cells.push(Cell::delta(row.deviation(metric).pct));
    }
    cells.push(Cell::number(row.deviation(Metric::AverageSqmPrice).abs, 1));
    for &metric in &HISTORY[..3] {
        cells.push(Cell::number(row.row.get(metric), 1));
    }
    for &metric in &HISTORY[3..] {
        cells.push(Cell::delta(row.row.get(metric)));
    }
    cells
}

/// Baselines per apartment type for the selected types.
fn baselines_table(data: &RootData, state: &DashboardState) -> Table {
    let mut columns = vec![Column::text("Тип")];
    columns.extend(COMPARED.iter().map(|(m, _)| Column::number(format!("КО: {}", m.label()))));
    let mut table = Table::new("КО по типам квартир", columns);

    let by_metric: Vec<_> = COMPARED
        .iter()
        .map(|&(metric, digits)| {
            (
                baselines_by_room_type(&data.projects, metric, &state.settings),
                digits,
            )
        })
        .collect();

    for room in room_types(&data.projects)
        .into_iter()
        .filter(|r| state.rooms.matches(r))
    {
        let mut row = vec![room_cell(&room)];
        row.extend(
            by_metric
                .iter()
                .map(|(baselines, digits)| Cell::number(baselines.get(&room).copied(), *digits)),
        );
        table.push_item(row);
    }
    table
}

pub(super) fn render(report: &mut ReportView, data: &RootData, state: &DashboardState) {
    let mut metrics: Vec<Metric> = COMPARED.iter().map(|(m, _)| *m).collect();
    metrics.extend_from_slice(HISTORY);
    let comparison = compare_to_market(&data.projects, &state.query(metrics));

    report.kpis = COMPARED
        .iter()
        .map(|&(metric, digits)| {
            Kpi::new(format!("КО: {}", metric.label()), comparison.baseline(metric), digits)
        })
        .collect();

    let sqm_deviation: Vec<f64> = comparison
        .rows
        .iter()
        .map(|r| r.deviation(Metric::AverageSqmPrice).pct.unwrap_or(0.0))
        .collect();
    let labels: Vec<String> = comparison.rows.iter().map(|r| row_label(&r.row)).collect();

    let mut columns = vec![Column::text("ЖК"), Column::text("Тип")];
    for &(metric, _) in COMPARED {
        columns.push(Column::number(metric.label()));
        columns.push(Column::number("Откл. от КО, %"));
    }
    columns.push(Column::number("Откл. цены м² от КО, тыс."));
    columns.extend(HISTORY.iter().map(|m| Column::number(m.label())));

    let mut table = grouped_table("Сравнение с КО", columns, comparison.rows, cells);
    for &column in DEVIATION_COLUMNS {
        table.apply_gradient(column);
    }
    table.apply_gradient(SQM_ABS_COLUMN);
    table.retain_expanded(&state.expanded);
    report.tables.push(table);
    report.tables.push(baselines_table(data, state));

    report.charts.push(
        ChartData::new(ChartKind::Bar, "Отклонение цены м² от КО, %", labels)
            .with_dataset("Откл. от КО, %", sqm_deviation),
    );
}
