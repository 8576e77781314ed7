//! Dashboard report views.
//!
//! Every view turns a snapshot plus a [`DashboardState`] into a
//! [`ReportView`]: KPI cards, tables and charts, ready to print or to
//! serialize.

mod competitive;
mod dynamics;
mod express;
mod floors;
mod forecast;
mod market;
mod marketing;
mod mortgage;
mod summary;

use std::fmt::Write as _;

use realty_dash_analytics_models::{Row, Unit};
use realty_dash_market_models::{RootData, RoomKey};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::ReportError;
use crate::chart::ChartData;
use crate::format::{fmt_delta, fmt_num, fmt_signed};
use crate::group::{ProjectRow, group_by_project};
use crate::state::DashboardState;
use crate::table::{Cell, Column, RowKind, Table};

/// The dashboard pages.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum View {
    Summary,
    Market,
    Express,
    Competitive,
    Mortgage,
    Forecast,
    Marketing,
    Dynamics,
    Floors,
}

impl View {
    /// Page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Summary => "Сводка",
            Self::Market => "Рынок",
            Self::Express => "Экспресс-анализ",
            Self::Competitive => "Конкурентный анализ",
            Self::Mortgage => "Ипотека",
            Self::Forecast => "Прогноз",
            Self::Marketing => "Маркетинг",
            Self::Dynamics => "Динамика",
            Self::Floors => "Сегодня по этажам",
        }
    }

    /// Whether the view shows only the selected project.
    #[must_use]
    pub const fn is_single_project(self) -> bool {
        matches!(self, Self::Summary | Self::Dynamics | Self::Floors)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Summary,
            Self::Market,
            Self::Express,
            Self::Competitive,
            Self::Mortgage,
            Self::Forecast,
            Self::Marketing,
            Self::Dynamics,
            Self::Floors,
        ]
    }
}

/// A headline figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub title: String,
    pub value: String,
    /// Change in percent shown next to the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

impl Kpi {
    #[must_use]
    pub fn new(title: impl Into<String>, value: Option<f64>, digits: usize) -> Self {
        Self {
            title: title.into(),
            value: fmt_num(value, digits),
            delta: None,
        }
    }

    /// A KPI whose value is itself a percentage change.
    #[must_use]
    pub fn change(title: impl Into<String>, pct: Option<f64>) -> Self {
        Self {
            title: title.into(),
            value: fmt_delta(pct),
            delta: None,
        }
    }

    /// A KPI whose value is a change in `unit`.
    #[must_use]
    pub fn change_in(title: impl Into<String>, value: Option<f64>, unit: Unit) -> Self {
        match unit {
            Unit::Pct => Self::change(title, value),
            Unit::Rub => Self {
                title: title.into(),
                value: fmt_signed(value, 2),
                delta: None,
            },
        }
    }

    #[must_use]
    pub fn with_delta(mut self, delta: Option<f64>) -> Self {
        self.delta = delta.filter(|v| v.is_finite());
        self
    }
}

/// A rendered dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub view: View,
    pub title: String,
    /// Project the page is about, for single-project views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub kpis: Vec<Kpi>,
    pub tables: Vec<Table>,
    pub charts: Vec<ChartData>,
}

impl ReportView {
    fn new(view: View) -> Self {
        Self {
            view,
            title: view.title().to_string(),
            project: None,
            kpis: vec![],
            tables: vec![],
            charts: vec![],
        }
    }

    /// Serializes the view as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// * If serialization fails
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders the view as plain text for the terminal.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let heading = self
            .project
            .as_ref()
            .map_or_else(|| self.title.clone(), |p| format!("{} · {p}", self.title));
        let _ = writeln!(out, "{heading}");
        let _ = writeln!(out, "{}", "═".repeat(heading.chars().count()));

        if !self.kpis.is_empty() {
            out.push('\n');
            for kpi in &self.kpis {
                let _ = match kpi.delta {
                    Some(delta) => writeln!(
                        out,
                        "  {}: {} ({})",
                        kpi.title,
                        kpi.value,
                        fmt_delta(Some(delta))
                    ),
                    None => writeln!(out, "  {}: {}", kpi.title, kpi.value),
                };
            }
        }

        for table in &self.tables {
            out.push('\n');
            out.push_str(&table.render());
        }

        for chart in self.charts.iter().filter(|c| !c.is_empty()) {
            out.push('\n');
            out.push_str(&render_chart(chart));
        }

        out
    }
}

/// Text summary of a chart: one line per label with every dataset value.
fn render_chart(chart: &ChartData) -> String {
    let mut columns = vec![Column::text("")];
    columns.extend(chart.datasets.iter().map(|d| Column::number(d.label.clone())));

    let mut table = Table::new(format!("График ({}): {}", chart.kind, chart.title), columns);
    for (i, label) in chart.labels.iter().enumerate() {
        let mut cells = vec![Cell::text(label.clone())];
        cells.extend(
            chart
                .datasets
                .iter()
                .map(|d| Cell::number(d.values.get(i).copied(), 2)),
        );
        table.push_item(cells);
    }
    table.render()
}

/// Renders `view` for `data` under `state`.
///
/// # Errors
///
/// * If a single-project view is asked for a project not in `data`
pub fn render_view(
    view: View,
    data: &RootData,
    state: &DashboardState,
) -> Result<ReportView, ReportError> {
    log::debug!("rendering {view} view");
    let mut report = ReportView::new(view);

    match view {
        View::Summary => summary::render(&mut report, data, state)?,
        View::Market => market::render(&mut report, data, state),
        View::Express => express::render(&mut report, data, state),
        View::Competitive => competitive::render(&mut report, data, state),
        View::Mortgage => mortgage::render(&mut report, data, state),
        View::Forecast => forecast::render(&mut report, data, state),
        View::Marketing => marketing::render(&mut report, data, state),
        View::Dynamics => dynamics::render(&mut report, data, state)?,
        View::Floors => floors::render(&mut report, data, state)?,
    }

    Ok(report)
}

/// `1 тип`, `3 типа`, `5 типов`.
fn types_count(n: usize) -> String {
    let word = match (n % 10, n % 100) {
        (1, r) if r != 11 => "тип",
        (2..=4, r) if !(12..=14).contains(&r) => "типа",
        _ => "типов",
    };
    format!("{n} {word}")
}

/// A change in `unit`: a signed percentage or a signed value.
fn change_cell(value: Option<f64>, unit: Unit) -> Cell {
    match unit {
        Unit::Pct => Cell::delta(value),
        Unit::Rub => Cell::signed(value, 2),
    }
}

/// Room column cell.
fn room_cell(room: &RoomKey) -> Cell {
    Cell::text(room.label())
}

/// Builds a table with one header row per project followed by that
/// project's rows. `cells` renders the columns after the first one.
fn grouped_table<T, F>(
    title: &str,
    columns: Vec<Column>,
    rows: Vec<T>,
    mut cells: F,
) -> Table
where
    T: ProjectRow,
    F: FnMut(&T) -> Vec<Cell>,
{
    let mut table = Table::new(title, columns);

    for group in group_by_project(rows) {
        table.push_grouped(
            &group.project,
            RowKind::Group,
            vec![Cell::text(format!(
                "{} ({})",
                group.project,
                types_count(group.rows.len())
            ))],
        );
        for row in &group.rows {
            let mut item = vec![Cell::text("")];
            item.extend(cells(row));
            table.push_grouped(&group.project, RowKind::Item, item);
        }
    }

    table
}

/// Values of `metric` across `rows`.
fn column<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    metric: realty_dash_analytics_models::Metric,
) -> Vec<Option<f64>> {
    rows.into_iter().map(|r| r.get(metric)).collect()
}

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::NO_DATA;

    #[test]
    fn plural_forms() {
        assert_eq!(types_count(1), "1 тип");
        assert_eq!(types_count(3), "3 типа");
        assert_eq!(types_count(5), "5 типов");
        assert_eq!(types_count(11), "11 типов");
        assert_eq!(types_count(21), "21 тип");
    }

    #[test]
    fn every_view_renders_on_empty_snapshot() {
        let data = RootData::default();
        let state = DashboardState::new(&data);

        for view in View::all() {
            let report = render_view(*view, &data, &state).unwrap();
            assert!(report.project.is_none(), "{view}");
            assert!(!report.tables.is_empty(), "{view}");
            assert!(report.tables.iter().all(Table::is_empty), "{view}");
            assert!(report.render_text().contains(NO_DATA), "{view}");
        }
    }

    #[test]
    fn every_view_renders_fixture() {
        let data = test_support::snapshot();
        let mut state = DashboardState::new(&data);
        state.expanded.expand_all(data.project_names());

        for view in View::all() {
            let report = render_view(*view, &data, &state).unwrap();
            assert_eq!(report.view, *view);
            assert!(!report.tables.is_empty(), "{view}");
            let json = report.to_json().unwrap();
            assert!(json.contains("\"kpis\""));
            assert!(!report.render_text().is_empty());
        }
    }

    #[test]
    fn view_names_parse() {
        assert_eq!("half_year".parse::<View>().ok(), None);
        assert_eq!("floors".parse::<View>().unwrap(), View::Floors);
        assert_eq!(View::Competitive.to_string(), "competitive");
    }
}
