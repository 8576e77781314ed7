//! Express comparison: one parameter across projects today, over the last
//! week, two weeks and month.

use realty_dash_analytics::stats::mean;
use realty_dash_analytics::{build_rows, express_points};
use realty_dash_analytics_models::{ChangePeriod, ExpressPoint, Metric, Row};
use realty_dash_market_models::RootData;

use super::{Kpi, ReportView, change_cell, column, grouped_table, room_cell};
use crate::chart::{ChartData, ChartKind};
use crate::state::DashboardState;
use crate::table::{Cell, Column, Table};

const PERIODS: &[(ChangePeriod, &str)] = &[
    (ChangePeriod::Weekly, "Неделя"),
    (ChangePeriod::Biweekly, "2 недели"),
    (ChangePeriod::Monthly, "Месяц"),
];

fn points_table(title: &str, points: &[ExpressPoint]) -> Table {
    let mut table = Table::new(
        title,
        vec![
            Column::text("ЖК"),
            Column::number("Месяц назад"),
            Column::number("2 недели назад"),
            Column::number("Сегодня"),
        ],
    );
    for point in points {
        table.push_item(vec![
            Cell::text(point.project.clone()),
            Cell::number(point.month_ago, 1),
            Cell::number(point.two_weeks_ago, 1),
            Cell::number(point.today, 1),
        ]);
    }
    table
}

pub(super) fn render(report: &mut ReportView, data: &RootData, state: &DashboardState) {
    let parameter = state.parameter;
    let unit = state.unit;
    let current = parameter.current();
    let changes: Vec<Metric> = PERIODS
        .iter()
        .map(|&(period, _)| Metric::Change(period, parameter.field(unit)))
        .collect();

    let mut metrics = vec![current];
    metrics.extend(changes.iter().copied());
    let query = state.query(metrics);
    let rows = build_rows(&data.projects, &query);

    let suffix = parameter.change_unit(unit);
    report.kpis = PERIODS
        .iter()
        .zip(&changes)
        .map(|(&(_, title), &metric)| {
            Kpi::change_in(
                format!("{}, {title}", parameter.label()),
                mean(column(&rows, metric)),
                unit,
            )
        })
        .collect();

    let mut columns = vec![
        Column::text("ЖК"),
        Column::text("Тип"),
        Column::number(format!("Сегодня, {}", parameter.value_unit())),
    ];
    columns.extend(
        PERIODS
            .iter()
            .map(|(_, title)| Column::number(format!("{title}, {suffix}"))),
    );

    let title = format!("{}: изменение", parameter.label());
    let mut table = grouped_table(&title, columns, rows.clone(), |row: &Row| {
        let mut cells = vec![room_cell(&row.room), Cell::number(row.get(current), 1)];
        cells.extend(changes.iter().map(|&m| change_cell(row.get(m), unit)));
        cells
    });
    for index in 3..3 + PERIODS.len() {
        table.apply_gradient(index);
    }
    table.retain_expanded(&state.expanded);
    report.tables.push(table);

    let points = express_points(&data.projects, &query, parameter);
    report.tables.push(points_table(
        &format!("{}, {}", parameter.label(), parameter.value_unit()),
        &points,
    ));

    let projects: Vec<String> = points.iter().map(|p| p.project.clone()).collect();
    let project_mean = |metric: Metric| -> Vec<f64> {
        projects
            .iter()
            .map(|name| {
                mean(
                    rows.iter()
                        .filter(|r| r.project == *name)
                        .map(|r| r.get(metric)),
                )
                .unwrap_or(0.0)
            })
            .collect()
    };
    report.charts.push(
        ChartData::new(
            ChartKind::Bar,
            format!("{}: изменение, {suffix}", parameter.label()),
            projects.clone(),
        )
        .with_dataset("Месяц", project_mean(changes[2]))
        .with_dataset("Неделя", project_mean(changes[0])),
    );
    report.charts.push(
        ChartData::new(
            ChartKind::Bar,
            format!("{}, {}", parameter.label(), parameter.value_unit()),
            projects,
        )
        .with_dataset(
            "Месяц назад",
            points.iter().map(|p| p.month_ago.unwrap_or(0.0)).collect(),
        )
        .with_dataset(
            "2 недели назад",
            points.iter().map(|p| p.two_weeks_ago.unwrap_or(0.0)).collect(),
        )
        .with_dataset(
            "Сегодня",
            points.iter().map(|p| p.today.unwrap_or(0.0)).collect(),
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::super::View;
    use super::super::test_support::snapshot;
    use super::*;
    use realty_dash_analytics_models::{Parameter, Unit};

    fn render_in(unit: Unit, parameter: Parameter) -> ReportView {
        let data = snapshot();
        let mut state = DashboardState::new(&data);
        state.unit = unit;
        state.parameter = parameter;
        state.expanded.expand_all(data.project_names());
        let mut report = ReportView::new(View::Express);
        render(&mut report, &data, &state);
        report
    }

    #[test]
    fn percent_changes_are_averaged_over_types() {
        let report = render_in(Unit::Pct, Parameter::SqmPrice);
        let values: Vec<&str> = report.kpis.iter().map(|k| k.value.as_str()).collect();
        assert_eq!(values, ["+0,20%", "+0,50%", "+0,25%"]);
        assert_eq!(report.kpis[0].title, "Цена м², Неделя");
        assert_eq!(report.tables[0].columns[3].title, "Неделя, %");
    }

    #[test]
    fn earlier_values_come_from_the_changes() {
        let report = render_in(Unit::Pct, Parameter::SqmPrice);
        let points = &report.tables[1];
        assert_eq!(points.rows[0].cells[0].text, "Азимут");
        assert_eq!(points.rows[0].cells[1].text, "—");

        let bereg = &points.rows[1].cells;
        assert_eq!(bereg[0].text, "Берег");
        assert_eq!(bereg[3].text, "275,0");
        assert_eq!(bereg[2].text, "298,5");
        assert_eq!(bereg[1].text, "274,1");
        assert_eq!(report.charts[1].labels, ["Азимут", "Берег"]);
    }

    #[test]
    fn rouble_unit_reads_absolute_changes() {
        let report = render_in(Unit::Rub, Parameter::SqmPrice);
        assert_eq!(report.kpis[1].value, "+1,50");
        assert_eq!(report.tables[0].columns[5].title, "Месяц, тыс. руб.");

        let month: Vec<&str> = report.tables[0]
            .rows
            .iter()
            .filter_map(|r| r.cells.get(5))
            .map(|c| c.text.as_str())
            .collect();
        assert!(month.contains(&"+3,00"));
        assert!(month.contains(&"-1,25"));
    }
}
