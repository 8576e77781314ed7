//! `realty_dash projects`: the projects of the snapshot with their lot
//! totals.

use std::fmt::Write as _;

use realty_dash_analytics::all_project_totals;
use realty_dash_analytics_models::{ProjectFilter, ProjectTotals};
use realty_dash_market_models::RootData;
use realty_dash_report::{Cell, Column, Table};

/// Projects passing `filter`, ordered by name.
pub fn totals(data: &RootData, filter: &ProjectFilter) -> Vec<ProjectTotals> {
    all_project_totals(&data.projects, filter)
}

/// Renders `totals` as a text table, with the snapshot date when known.
pub fn render(data: &RootData, totals: &[ProjectTotals]) -> String {
    let mut table = Table::new(
        "ЖК",
        vec![
            Column::text("ЖК"),
            Column::number("Типов"),
            Column::number("В продаже, шт."),
            Column::number("Вымываемость, шт."),
        ],
    );

    for total in totals {
        #[allow(clippy::cast_precision_loss)]
        let types = data
            .project(&total.project)
            .map(|p| p.apartments().len() as f64);
        table.push_item(vec![
            Cell::text(total.project.clone()),
            Cell::number(types, 0),
            Cell::number(total.on_sale, 0),
            Cell::number(total.washed_out, 0),
        ]);
    }

    let mut out = table.render();
    if let Some(updated) = data.last_updated_at() {
        let _ = write!(out, "\nДанные на {}\n", updated.format("%d.%m.%Y"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_projects_by_name() {
        let data: RootData = serde_json::from_str(
            r#"{
                "projects": [
                    { "jk_name": "Берег", "apartments_by_type": {
                        "studio": { "current_metrics": { "apartment_count": 4 } },
                        "1-room": { "current_metrics": { "apartment_count": 2 } }
                    } },
                    { "jk_name": "Азимут", "apartments_by_type": {} }
                ],
                "last_updated": "2025-04-30"
            }"#,
        )
        .unwrap();

        let totals = totals(&data, &ProjectFilter::all());
        assert_eq!(totals[0].project, "Азимут");
        assert_eq!(totals[1].on_sale, Some(6.0));

        let text = render(&data, &totals);
        assert!(text.contains("Данные на 30.04.2025"));
        let bereg = text.lines().find(|l| l.starts_with("Берег")).unwrap();
        assert!(bereg.contains('2'));
        assert!(bereg.contains('6'));
    }
}
