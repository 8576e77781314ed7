//! Lots on sale floor by floor for the selected project.

use std::collections::BTreeSet;

use realty_dash_analytics::stats::sum;
use realty_dash_analytics::{floor_details, floor_distribution};
use realty_dash_analytics_models::{FloorDetail, FloorRow};
use realty_dash_market_models::{RoomKey, RootData};

use super::{Kpi, ReportView, room_cell};
use crate::ReportError;
use crate::chart::{ChartData, ChartKind};
use crate::state::DashboardState;
use crate::table::{Cell, Column, RowKind, Table};

fn distribution_table(rows: &[FloorRow], rooms: &[RoomKey]) -> Table {
    let mut columns = vec![Column::text("Этаж")];
    columns.extend(rooms.iter().map(|r| Column::number(r.label())));
    columns.push(Column::number("Всего"));
    let mut table = Table::new("Лоты по этажам", columns);

    for row in rows {
        let counts: Vec<Option<f64>> = rooms.iter().map(|r| row.counts.get(r).copied()).collect();
        let mut cells = vec![Cell::text(row.floor.to_string())];
        cells.extend(counts.iter().map(|&c| Cell::number(c, 0)));
        cells.push(Cell::number(sum(counts), 0));
        table.push_item(cells);
    }

    if !rows.is_empty() {
        let mut totals = vec![Cell::text("Итого")];
        totals.extend(
            rooms
                .iter()
                .map(|r| Cell::number(sum(rows.iter().map(|row| row.counts.get(r).copied())), 0)),
        );
        totals.push(Cell::number(
            sum(rows
                .iter()
                .flat_map(|row| rooms.iter().map(|r| row.counts.get(r).copied()))),
            0,
        ));
        table.push(RowKind::Total, totals);
    }
    table
}

fn details_table(details: &[FloorDetail]) -> Table {
    let mut table = Table::new(
        "Параметры по этажам",
        vec![
            Column::text("Этаж"),
            Column::text("Тип"),
            Column::number("Лотов, шт."),
            Column::number("Площадь ср., м²"),
            Column::number("Цена м², тыс."),
            Column::number("Цена лота, млн"),
        ],
    );
    for detail in details {
        table.push_item(vec![
            Cell::text(detail.floor.to_string()),
            room_cell(&detail.room),
            Cell::number(detail.count, 0),
            Cell::number(detail.average_area, 1),
            Cell::number(detail.sqm_price, 1),
            Cell::number(detail.lot_price, 2),
        ]);
    }
    table.highlight_extremes(4);
    table
}

pub(super) fn render(
    report: &mut ReportView,
    data: &RootData,
    state: &DashboardState,
) -> Result<(), ReportError> {
    let project = state.selected(data)?;
    report.project = project.map(|p| p.jk_name.clone());

    let rows: Vec<FloorRow> = project
        .map_or_else(Vec::new, floor_distribution)
        .into_iter()
        .map(|mut row| {
            row.counts.retain(|room, _| state.rooms.matches(room));
            row
        })
        .filter(|row| !row.counts.is_empty())
        .collect();
    let details: Vec<FloorDetail> = project
        .map_or_else(Vec::new, floor_details)
        .into_iter()
        .filter(|d| state.rooms.matches(&d.room))
        .collect();
    let rooms: Vec<RoomKey> = rows
        .iter()
        .flat_map(|r| r.counts.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let floor_count = rows.len() as f64;
    report.kpis = vec![
        Kpi::new("Этажей с лотами", Some(floor_count), 0),
        Kpi::new(
            "Лотов на этажах, шт.",
            sum(rows.iter().flat_map(|r| r.counts.values().map(|&c| Some(c)))),
            0,
        ),
        Kpi::new(
            "Самый высокий этаж",
            rows.iter().map(|r| f64::from(r.floor)).reduce(f64::max),
            0,
        ),
    ];

    report.tables.push(distribution_table(&rows, &rooms));
    report.tables.push(details_table(&details));

    let mut chart = ChartData::new(
        ChartKind::Bar,
        "Лоты по этажам",
        rows.iter().map(|r| r.floor.to_string()).collect(),
    );
    for room in &rooms {
        chart = chart.with_dataset(
            room.label(),
            rows.iter()
                .map(|r| r.counts.get(room).copied().unwrap_or(0.0))
                .collect(),
        );
    }
    report.charts.push(chart);

    Ok(())
}
