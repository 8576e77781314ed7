//! Change of the selected project's prices, areas and payments over the
//! chosen period.

use realty_dash_analytics::stats::mean;
use realty_dash_analytics::{period_change, price_dynamics_series};
use realty_dash_analytics_models::{DynamicsPoint, Parameter, PeriodChange};
use realty_dash_market_models::{Project, RoomKey, RootData};

use super::{Kpi, ReportView, change_cell, room_cell};
use crate::ReportError;
use crate::chart::{ChartData, ChartKind};
use crate::state::DashboardState;
use crate::table::{Cell, Column, Table};

/// Months of price history shown.
const HISTORY_MONTHS: usize = 4;

/// Changes per parameter, in the selected unit, for each selected
/// apartment type.
fn changes(project: &Project, state: &DashboardState) -> Vec<(RoomKey, Vec<PeriodChange>)> {
    project
        .apartments()
        .into_iter()
        .filter(|(room, _)| state.rooms.matches(room))
        .map(|(room, apartment)| {
            let values = Parameter::all()
                .iter()
                .map(|&p| period_change(apartment, state.period, p.field(state.unit)))
                .collect();
            (room, values)
        })
        .collect()
}

fn overall(changes: &[(RoomKey, Vec<PeriodChange>)], index: usize) -> PeriodChange {
    let column: Vec<PeriodChange> = changes.iter().map(|(_, values)| values[index]).collect();
    PeriodChange {
        value: mean(column.iter().map(|c| c.value)),
        estimated: column.iter().any(|c| c.estimated && c.value.is_some()),
    }
}

fn history_table(points: &[DynamicsPoint]) -> Table {
    let mut table = Table::new(
        "Динамика средней цены м²",
        vec![
            Column::text("Месяц"),
            Column::number("Цена м², тыс."),
            Column::number("Изм., %"),
        ],
    );
    let mut previous: Option<f64> = None;
    for point in points {
        let change = match (previous, point.average_sqm_price) {
            (Some(before), Some(now)) if before != 0.0 => Some((now - before) / before * 100.0),
            _ => None,
        };
        table.push_item(vec![
            Cell::text(point.label.clone()),
            Cell::number(point.average_sqm_price, 1),
            Cell::delta(change),
        ]);
        previous = point.average_sqm_price;
    }
    table
}

pub(super) fn render(
    report: &mut ReportView,
    data: &RootData,
    state: &DashboardState,
) -> Result<(), ReportError> {
    let project = state.selected(data)?;
    report.project = project.map(|p| p.jk_name.clone());

    let period = state.period.label().to_lowercase();
    let changes = project.map_or_else(Vec::new, |p| changes(p, state));

    let unit = state.unit;
    report.kpis = Parameter::all()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let change = overall(&changes, i);
            let title = format!("{}, изм. за {period}", p.label());
            let mut kpi = Kpi::change_in(title, change.value, unit);
            if change.estimated {
                kpi.value = format!("≈{}", kpi.value);
            }
            kpi
        })
        .collect();

    let mut columns = vec![Column::text("Тип")];
    columns.extend(
        Parameter::all()
            .iter()
            .map(|p| Column::number(format!("{}, {}", p.label(), p.change_unit(unit)))),
    );
    let mut table = Table::new(format!("Изменение за {period}"), columns);
    for (room, values) in &changes {
        let mut cells = vec![room_cell(room)];
        cells.extend(
            values
                .iter()
                .map(|c| change_cell(c.value, unit).estimated(c.estimated)),
        );
        table.push_item(cells);
    }
    table.apply_gradient(1);
    report.tables.push(table);

    let history = project.map_or_else(Vec::new, |p| price_dynamics_series(p, HISTORY_MONTHS));
    report.tables.push(history_table(&history));

    let sqm_unit = Parameter::SqmPrice.change_unit(unit);
    report.charts.push(
        ChartData::new(
            ChartKind::Bar,
            format!("Изменение цены м² за {period}, {sqm_unit}"),
            changes.iter().map(|(room, _)| room.label().to_string()).collect(),
        )
        .with_dataset(
            format!("Цена м², {sqm_unit}"),
            changes
                .iter()
                .map(|(_, values)| values[0].value.unwrap_or(0.0))
                .collect(),
        ),
    );
    report.charts.push(
        ChartData::new(
            ChartKind::Line,
            "Средняя цена м², тыс. руб.",
            history.iter().map(|p| p.label.clone()).collect(),
        )
        .with_dataset(
            "Цена м², тыс.",
            history
                .iter()
                .map(|p| p.average_sqm_price.unwrap_or(0.0))
                .collect(),
        ),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::View;
    use super::super::test_support::snapshot;
    use super::*;
    use realty_dash_analytics_models::{Period, Unit};

    fn render_for(period: Period) -> ReportView {
        render_in(period, Unit::Pct)
    }

    fn render_in(period: Period, unit: Unit) -> ReportView {
        let data = snapshot();
        let mut state = DashboardState::new(&data);
        state.period = period;
        state.unit = unit;
        let mut report = ReportView::new(View::Dynamics);
        render(&mut report, &data, &state).unwrap();
        report
    }

    #[test]
    fn monthly_changes_are_recorded() {
        let report = render_for(Period::Month);
        assert_eq!(report.project.as_deref(), Some("Берег"));
        // (1.0 - 0.5) / 2
        assert_eq!(report.kpis[0].value, "+0,25%");

        let table = &report.tables[0];
        assert_eq!(table.title, "Изменение за месяц");
        assert_eq!(table.rows[0].cells[1].text, "+1,00%");
        assert_eq!(table.rows[1].cells[1].text, "-0,50%");
    }

    #[test]
    fn quarter_marks_extrapolated_values() {
        let report = render_for(Period::Quarter);
        // Studio has a recorded 3-month change, the 2-room type is
        // extrapolated from its monthly change.
        assert_eq!(report.tables[0].rows[0].cells[1].text, "+3,40%");
        assert_eq!(report.tables[0].rows[1].cells[1].text, "≈-1,50%");
        assert_eq!(report.kpis[0].value, "≈+0,95%");
    }

    #[test]
    fn rouble_unit_reads_absolute_changes() {
        let report = render_in(Period::Month, Unit::Rub);
        let table = &report.tables[0];
        assert_eq!(table.columns[1].title, "Цена м², тыс. руб.");
        assert_eq!(table.columns[3].title, "Площадь, м²");
        assert_eq!(table.rows[0].cells[1].text, "+3,00");
        assert_eq!(table.rows[1].cells[1].text, "-1,25");
        assert_eq!(report.charts[0].datasets[0].values, [3.0, -1.25]);

        // No recorded quarter in roubles: both types are extrapolated.
        let quarter = render_in(Period::Quarter, Unit::Rub);
        assert_eq!(quarter.tables[0].rows[0].cells[1].text, "≈+9,00");
        assert_eq!(quarter.tables[0].rows[1].cells[1].text, "≈-3,75");
    }

    #[test]
    fn price_history_is_listed_oldest_first() {
        let report = render_for(Period::Month);
        let history = &report.tables[1];
        assert_eq!(history.rows.len(), 3);
        assert_eq!(history.rows[0].cells[0].text, "Февраль 2025");
        assert_eq!(history.rows[2].cells[2].text, "+1,01%");
        assert_eq!(report.charts[1].datasets[0].values, [290.0, 297.0, 300.0]);
    }

    #[test]
    fn unknown_project_is_an_error() {
        let data = snapshot();
        let mut state = DashboardState::new(&data);
        state.selected_project = Some("Нет такого".to_string());
        let mut report = ReportView::new(View::Dynamics);
        assert!(matches!(
            render(&mut report, &data, &state),
            Err(ReportError::UnknownProject(_))
        ));
    }
}
