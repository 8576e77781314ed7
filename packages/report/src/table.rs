//! Tables of formatted cells, serializable for front-ends and renderable
//! as aligned text for the terminal.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::format::{fmt_delta, fmt_num, fmt_signed};
use crate::gradient::{CellStyle, Gradient, gradient_intensity};
use crate::group::ExpandedGroups;

/// Shown in place of the rows when the filters leave nothing.
pub const NO_DATA: &str = "Нет данных для выбранных фильтров";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub title: String,
    pub align: Align,
}

impl Column {
    #[must_use]
    pub fn text(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            align: Align::Left,
        }
    }

    #[must_use]
    pub fn number(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            align: Align::Right,
        }
    }
}

/// Smallest or largest value of a highlighted column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Extreme {
    Min,
    Max,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Display text.
    pub text: String,
    /// Underlying number, for colouring and highlighting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extreme: Option<Extreme>,
}

impl Cell {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A number with `digits` fraction digits.
    #[must_use]
    pub fn number(value: Option<f64>, digits: usize) -> Self {
        Self {
            text: fmt_num(value, digits),
            value: value.filter(|v| v.is_finite()),
            ..Self::default()
        }
    }

    /// A signed percentage.
    #[must_use]
    pub fn delta(pct: Option<f64>) -> Self {
        Self {
            text: fmt_delta(pct),
            value: pct.filter(|v| v.is_finite()),
            ..Self::default()
        }
    }

    /// A signed change with `digits` fraction digits.
    #[must_use]
    pub fn signed(value: Option<f64>, digits: usize) -> Self {
        Self {
            text: fmt_signed(value, digits),
            value: value.filter(|v| v.is_finite()),
            ..Self::default()
        }
    }

    /// Prefixes the text with `≈` when the value is an estimate.
    #[must_use]
    pub fn estimated(mut self, estimated: bool) -> Self {
        if estimated && self.value.is_some() {
            self.text = format!("≈{}", self.text);
        }
        self
    }

    fn display(&self) -> String {
        let mut text = self.text.clone();
        if let Some(gradient) = self.gradient {
            text.push(' ');
            text.push(gradient.hue.marker());
        }
        match self.extreme {
            Some(Extreme::Min) => text.push_str(" ↓"),
            Some(Extreme::Max) => text.push_str(" ↑"),
            None => {}
        }
        text
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RowKind {
    /// A project header.
    Group,
    /// A data row.
    Item,
    /// Totals.
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub kind: RowKind,
    /// Project group the row belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

impl Table {
    #[must_use]
    pub fn new(title: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows: vec![],
        }
    }

    pub fn push(&mut self, kind: RowKind, cells: Vec<Cell>) {
        self.rows.push(TableRow {
            kind,
            group: None,
            cells,
        });
    }

    pub fn push_item(&mut self, cells: Vec<Cell>) {
        self.push(RowKind::Item, cells);
    }

    /// Adds a data row belonging to the project group `group`.
    pub fn push_grouped(&mut self, group: &str, kind: RowKind, cells: Vec<Cell>) {
        self.rows.push(TableRow {
            kind,
            group: Some(group.to_string()),
            cells,
        });
    }

    /// Drops the data rows of collapsed groups, keeping their headers.
    /// Call after colouring so scales still span every row.
    pub fn retain_expanded(&mut self, expanded: &ExpandedGroups) {
        self.rows.retain(|row| match (&row.kind, &row.group) {
            (RowKind::Item, Some(group)) => expanded.is_expanded(group),
            _ => true,
        });
    }

    /// Whether the table has nothing but totals to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.kind == RowKind::Total)
    }

    fn item_values(&self, column: usize) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .filter(|r| r.kind == RowKind::Item)
            .map(|r| r.cells.get(column).and_then(|c| c.value))
            .collect()
    }

    /// Colours the data cells of `column` on a diverging scale.
    pub fn apply_gradient(&mut self, column: usize) {
        let values = self.item_values(column);
        for row in self.rows.iter_mut().filter(|r| r.kind == RowKind::Item) {
            if let Some(cell) = row.cells.get_mut(column) {
                cell.gradient = gradient_intensity(cell.value, &values);
                cell.style = cell.gradient.map(|g| g.style());
            }
        }
    }

    /// Marks the smallest and largest data cells of `column`.
    #[allow(clippy::float_cmp)]
    pub fn highlight_extremes(&mut self, column: usize) {
        let values: Vec<f64> = self.item_values(column).into_iter().flatten().collect();
        let (Some(min), Some(max)) = (
            values.iter().copied().reduce(f64::min),
            values.iter().copied().reduce(f64::max),
        ) else {
            return;
        };

        for row in self.rows.iter_mut().filter(|r| r.kind == RowKind::Item) {
            if let Some(cell) = row.cells.get_mut(column) {
                cell.extreme = match cell.value {
                    Some(v) if v == min => Some(Extreme::Min),
                    Some(v) if v == max => Some(Extreme::Max),
                    _ => None,
                };
            }
        }
    }

    /// Renders the table as aligned text.
    #[must_use]
    pub fn render(&self) -> String {
        let rendered: Vec<(RowKind, Vec<String>)> = self
            .rows
            .iter()
            .map(|row| {
                let cells = (0..self.columns.len())
                    .map(|i| row.cells.get(i).map_or_else(String::new, Cell::display))
                    .collect();
                (row.kind, cells)
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                rendered
                    .iter()
                    .map(|(_, cells)| width(&cells[i]))
                    .chain(std::iter::once(width(&column.title)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        if !self.title.is_empty() {
            let _ = writeln!(out, "{}", self.title);
        }

        let header: Vec<String> = self.columns.iter().map(|c| c.title.clone()).collect();
        out.push_str(&self.line(&header, &widths));
        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        out.push_str(&rule.join("─┼─"));
        out.push('\n');

        if self.is_empty() {
            let _ = writeln!(out, "{NO_DATA}");
            return out;
        }

        for (kind, cells) in &rendered {
            if *kind == RowKind::Total {
                out.push_str(&rule.join("─┼─"));
                out.push('\n');
            }
            out.push_str(&self.line(cells, &widths));
        }
        out
    }

    fn line(&self, cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .zip(&self.columns)
            .map(|((cell, w), column)| {
                let pad = " ".repeat(w.saturating_sub(width(cell)));
                match column.align {
                    Align::Left => format!("{cell}{pad}"),
                    Align::Right => format!("{pad}{cell}"),
                }
            })
            .collect();
        let mut line = padded.join(" │ ").trim_end().to_string();
        line.push('\n');
        line
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}
