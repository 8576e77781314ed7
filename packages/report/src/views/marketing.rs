//! Marketing programs of the selected projects.

use std::collections::BTreeSet;

use realty_dash_analytics::{promotion_distribution, promotion_rows};
use realty_dash_analytics_models::{PromotionRow, PromotionShare};
use realty_dash_market_models::RootData;

use super::{Kpi, ReportView, grouped_table};
use crate::chart::{ChartData, ChartKind};
use crate::state::DashboardState;
use crate::table::{Cell, Column, RowKind, Table};

/// `1 программа`, `3 программы`, `5 программ`.
fn programs_count(n: usize) -> String {
    let word = match (n % 10, n % 100) {
        (1, r) if r != 11 => "программа",
        (2..=4, r) if !(12..=14).contains(&r) => "программы",
        _ => "программ",
    };
    format!("{n} {word}")
}

fn programs_table(rows: Vec<PromotionRow>, state: &DashboardState) -> Table {
    let mut table = grouped_table(
        "Маркетинговые программы",
        vec![Column::text("ЖК"), Column::text("Тип"), Column::text("Описание")],
        rows,
        |row: &PromotionRow| {
            vec![
                Cell::text(row.kind.clone()),
                Cell::text(row.description.clone()),
            ]
        },
    );

    // Headers count programs, not apartment types.
    let sizes: Vec<usize> = table
        .rows
        .iter()
        .filter(|r| r.kind == RowKind::Group)
        .map(|header| {
            table
                .rows
                .iter()
                .filter(|r| r.kind == RowKind::Item && r.group == header.group)
                .count()
        })
        .collect();
    for (header, size) in table
        .rows
        .iter_mut()
        .filter(|r| r.kind == RowKind::Group)
        .zip(sizes)
    {
        let project = header.group.clone().unwrap_or_default();
        header.cells = vec![Cell::text(format!("{project} ({})", programs_count(size)))];
    }

    table.retain_expanded(&state.expanded);
    table
}

fn distribution_table(shares: &[PromotionShare]) -> Table {
    let mut table = Table::new(
        "Распределение по типам",
        vec![
            Column::text("Тип"),
            Column::number("Программ, шт."),
            Column::number("Доля, %"),
        ],
    );
    for share in shares {
        #[allow(clippy::cast_precision_loss)]
        let count = share.count as f64;
        table.push_item(vec![
            Cell::text(share.kind.clone()),
            Cell::number(Some(count), 0),
            Cell::number(Some(share.percent), 1),
        ]);
    }
    table
}

pub(super) fn render(report: &mut ReportView, data: &RootData, state: &DashboardState) {
    let rows = promotion_rows(
        &data.projects,
        &state.projects,
        state.promotion_kind.as_deref(),
    );
    let shares = promotion_distribution(&rows);
    let projects: BTreeSet<&str> = rows.iter().map(|r| r.project.as_str()).collect();

    #[allow(clippy::cast_precision_loss)]
    let (total, project_count, kind_count) =
        (rows.len() as f64, projects.len() as f64, shares.len() as f64);
    report.kpis = vec![
        Kpi::new("Всего программ", Some(total), 0),
        Kpi::new("ЖК с программами", Some(project_count), 0),
        Kpi::new("Типов программ", Some(kind_count), 0),
    ];

    report.tables.push(distribution_table(&shares));
    report.tables.push(programs_table(rows, state));

    report.charts.push(
        ChartData::new(
            ChartKind::Pie,
            "Типы маркетинговых программ",
            shares.iter().map(|s| s.kind.clone()).collect(),
        )
        .with_dataset("Доля, %", shares.iter().map(|s| s.percent).collect()),
    );
}

#[cfg(test)]
mod tests {
    use super::super::View;
    use super::super::test_support::snapshot;
    use super::*;
    use realty_dash_analytics::OTHER_PROMOTION_KIND;

    #[test]
    fn programs_are_grouped_and_counted() {
        let data = snapshot();
        let state = DashboardState::new(&data);

        let mut report = ReportView::new(View::Marketing);
        render(&mut report, &data, &state);

        assert_eq!(report.kpis[0].value, "3");
        assert_eq!(report.kpis[1].value, "2");

        let programs = &report.tables[1];
        assert_eq!(programs.rows[0].cells[0].text, "Берег (2 программы)");
        assert_eq!(programs.rows[1].cells[0].text, "Азимут (1 программа)");

        let chart = &report.charts[0];
        assert_eq!(chart.labels, ["Ипотека", OTHER_PROMOTION_KIND, "Скидки"]);
        assert_eq!(chart.datasets[0].style.point_colors.len(), 3);
    }

    #[test]
    fn kind_filter_narrows_programs() {
        let data = snapshot();
        let mut state = DashboardState::new(&data);
        state.promotion_kind = Some("Скидки".to_string());
        state.expanded.expand_all(data.project_names());

        let mut report = ReportView::new(View::Marketing);
        render(&mut report, &data, &state);

        let programs = &report.tables[1];
        assert_eq!(programs.rows.len(), 2);
        assert_eq!(programs.rows[1].cells[1].text, "Скидки");
        assert_eq!(report.tables[0].rows[0].cells[2].value, Some(100.0));
    }

    #[test]
    fn plural_forms() {
        assert_eq!(programs_count(1), "1 программа");
        assert_eq!(programs_count(4), "4 программы");
        assert_eq!(programs_count(12), "12 программ");
    }
}
