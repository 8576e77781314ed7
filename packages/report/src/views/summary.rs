//! Summary of the selected project, plus lot totals across projects.

use realty_dash_analytics::stats::{mean, sum};
use realty_dash_analytics::{build_rows, overall_change, project_totals};
use realty_dash_analytics_models::{ChangeField, Metric, Period, Row};
use realty_dash_market_models::RootData;

use super::{Kpi, ReportView, column, grouped_table, room_cell, types_count};
use crate::ReportError;
use crate::state::DashboardState;
use crate::table::{Cell, Column, RowKind, Table};

/// Pivot rows: metric, digits, and whether the "all types" column sums
/// instead of averaging.
const PARAMETERS: &[(Metric, usize, bool)] = &[
    (Metric::AverageSqmPrice, 1, false),
    (Metric::AverageLotPrice, 2, false),
    (Metric::AverageArea, 1, false),
    (Metric::MonthlyPayment, 1, false),
    (Metric::ApartmentCount, 0, true),
    (Metric::WashedOutCount, 0, true),
];

fn pivot(rows: &[Row]) -> Table {
    let mut columns = vec![Column::text("Параметр"), Column::number("Все типы")];
    columns.extend(rows.iter().map(|r| Column::number(r.room.label())));

    let mut table = Table::new("Параметры по типам квартир", columns);
    if rows.is_empty() {
        return table;
    }

    for &(metric, digits, summed) in PARAMETERS {
        let values = column(rows, metric);
        let overall = if summed {
            sum(values.iter().copied())
        } else {
            mean(values.iter().copied())
        };

        let mut cells = vec![Cell::text(metric.label()), Cell::number(overall, digits)];
        cells.extend(values.into_iter().map(|v| Cell::number(v, digits)));
        table.push_item(cells);
    }
    table
}

fn lots_by_project(data: &RootData, state: &DashboardState) -> Table {
    let query = state.query([Metric::ApartmentCount, Metric::WashedOutCount]);
    let rows = build_rows(&data.projects, &query);

    let on_sale_total = sum(column(&rows, Metric::ApartmentCount));
    let washed_total = sum(column(&rows, Metric::WashedOutCount));

    let mut table = grouped_table(
        "Лоты по ЖК",
        vec![
            Column::text("ЖК"),
            Column::text("Тип"),
            Column::number("В продаже, шт."),
            Column::number("Вымываемость, шт."),
        ],
        rows.clone(),
        |row: &Row| {
            vec![
                room_cell(&row.room),
                Cell::number(row.get(Metric::ApartmentCount), 0),
                Cell::number(row.get(Metric::WashedOutCount), 0),
            ]
        },
    );

    // Project headers carry the per-project sums of the visible types.
    for header in table.rows.iter_mut().filter(|r| r.kind == RowKind::Group) {
        let Some(project) = header.group.clone() else {
            continue;
        };
        let own: Vec<&Row> = rows.iter().filter(|r| r.project == project).collect();
        header.cells.push(Cell::text(types_count(own.len())));
        header.cells.push(Cell::number(
            sum(own.iter().map(|r| r.get(Metric::ApartmentCount))),
            0,
        ));
        header.cells.push(Cell::number(
            sum(own.iter().map(|r| r.get(Metric::WashedOutCount))),
            0,
        ));
        header.cells[0] = Cell::text(project);
    }

    table.retain_expanded(&state.expanded);
    table.push(
        RowKind::Total,
        vec![
            Cell::text("Итого"),
            Cell::text(""),
            Cell::number(on_sale_total, 0),
            Cell::number(washed_total, 0),
        ],
    );
    table
}

pub(super) fn render(
    report: &mut ReportView,
    data: &RootData,
    state: &DashboardState,
) -> Result<(), ReportError> {
    let Some(project) = state.selected(data)? else {
        report.tables.push(pivot(&[]));
        report.tables.push(lots_by_project(data, state));
        return Ok(());
    };
    report.project = Some(project.jk_name.clone());

    let metrics: Vec<Metric> = PARAMETERS.iter().map(|(m, _, _)| *m).collect();
    let query = state.project_query(project, metrics);
    let rows = build_rows(&data.projects, &query);

    let totals = project_totals(project);
    report.kpis = vec![
        Kpi::change(
            format!("Цена м², изм. за {}", Period::Month.label().to_lowercase()),
            overall_change(project, Period::Month, ChangeField::SqmPricePct).value,
        ),
        Kpi::new("Средняя цена м², тыс.", mean(column(&rows, Metric::AverageSqmPrice)), 1),
        Kpi::new("Сегодня в продаже, шт.", totals.on_sale, 0),
        Kpi::new("Вымываемость лотов, шт.", totals.washed_out, 0),
    ];

    report.tables.push(pivot(&rows));
    report.tables.push(lots_by_project(data, state));
    Ok(())
}
