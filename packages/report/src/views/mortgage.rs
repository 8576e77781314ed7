//! Mortgage: down payment and monthly payment against the market, with
//! the payment trend.

use realty_dash_analytics::{compare_to_market, payment_history};
use realty_dash_analytics_models::{ComparedRow, Metric, PaymentHistory};
use realty_dash_market_models::RootData;

use super::{Kpi, ReportView, grouped_table, room_cell};
use crate::chart::{ChartData, ChartKind, row_label};
use crate::state::DashboardState;
use crate::table::{Cell, Column};

const DOWN_PAYMENT_DEVIATION_COLUMN: usize = 3;
const PAYMENT_DEVIATION_COLUMN: usize = 5;

fn history(data: &RootData, row: &ComparedRow) -> PaymentHistory {
    data.project(&row.row.project)
        .and_then(|p| p.apartment(&row.row.room))
        .map(payment_history)
        .unwrap_or_default()
}

pub(super) fn render(report: &mut ReportView, data: &RootData, state: &DashboardState) {
    let comparison = compare_to_market(
        &data.projects,
        &state.query([Metric::DownPayment, Metric::MonthlyPayment]),
    );

    report.kpis = vec![
        Kpi::new("КО: ПВ, млн", comparison.baseline(Metric::DownPayment), 2),
        Kpi::new(
            "КО: платёж, тыс./мес.",
            comparison.baseline(Metric::MonthlyPayment),
            1,
        ),
        Kpi::new(
            "ПВ по умолчанию, %",
            Some(state.settings.default_down_payment_percent),
            0,
        ),
    ];

    let labels: Vec<String> = comparison.rows.iter().map(|r| row_label(&r.row)).collect();
    let payments: Vec<f64> = comparison
        .rows
        .iter()
        .map(|r| r.row.get(Metric::MonthlyPayment).unwrap_or(0.0))
        .collect();

    let columns = vec![
        Column::text("ЖК"),
        Column::text("Тип"),
        Column::number(Metric::DownPayment.label()),
        Column::number("Откл. от КО, %"),
        Column::number(Metric::MonthlyPayment.label()),
        Column::number("Откл. от КО, %"),
        Column::number("Платёж месяц назад"),
        Column::number("Изм. за месяц, тыс."),
        Column::number("Изм. за месяц, %"),
        Column::number("Изм. за квартал, тыс."),
        Column::number("Изм. за квартал, %"),
        Column::number("Изм. за полгода, тыс."),
        Column::number("Изм. за полгода, %"),
    ];

    let mut table = grouped_table("Ипотека", columns, comparison.rows, |row: &ComparedRow| {
        let trend = history(data, row);
        vec![
            room_cell(&row.row.room),
            Cell::number(row.row.get(Metric::DownPayment), 2),
            Cell::delta(row.deviation(Metric::DownPayment).pct),
            Cell::number(row.row.get(Metric::MonthlyPayment), 1),
            Cell::delta(row.deviation(Metric::MonthlyPayment).pct),
            Cell::number(trend.month_ago, 1),
            Cell::number(trend.month.abs, 1),
            Cell::delta(trend.month.pct),
            Cell::number(trend.quarter.abs, 1).estimated(true),
            Cell::delta(trend.quarter.pct).estimated(true),
            Cell::number(trend.half_year.abs, 1).estimated(true),
            Cell::delta(trend.half_year.pct).estimated(true),
        ]
    });
    table.apply_gradient(DOWN_PAYMENT_DEVIATION_COLUMN);
    table.apply_gradient(PAYMENT_DEVIATION_COLUMN);
    table.retain_expanded(&state.expanded);
    report.tables.push(table);

    report.charts.push(
        ChartData::new(ChartKind::Bar, "Ежемесячный платёж, тыс. руб.", labels)
            .with_dataset(Metric::MonthlyPayment.label(), payments),
    );
}
