//! Chart payloads in the shape chart front-ends consume: a list of labels
//! and one or more datasets of equal length.

use realty_dash_analytics_models::{Metric, Row};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Fixed dataset colours, cycled by dataset index.
pub const PALETTE: &[&str] = &[
    "#1a73e8", "#34a853", "#ea4335", "#fbbc04", "#9c27b0", "#ff9800", "#00acc1", "#5f6368",
];

/// Colour for the `index`-th dataset or slice.
#[must_use]
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Chart type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Doughnut,
    Radar,
}

/// Rendering hints for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStyle {
    /// Line or bar colour.
    pub color: String,
    /// Per-point colours for pie-like charts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub point_colors: Vec<String>,
    /// Dashed line, used for forecast bounds.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dashed: bool,
}

/// One series of values aligned with the chart labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub style: DatasetStyle,
}

/// A complete chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// An empty chart of `kind`.
    #[must_use]
    pub fn new(kind: ChartKind, title: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            labels,
            datasets: vec![],
        }
    }

    /// Appends a dataset coloured from [`PALETTE`] by its position.
    #[must_use]
    pub fn with_dataset(mut self, label: impl Into<String>, values: Vec<f64>) -> Self {
        let color = palette_color(self.datasets.len()).to_string();
        let point_colors = if matches!(self.kind, ChartKind::Pie | ChartKind::Doughnut) {
            (0..values.len())
                .map(|i| palette_color(i).to_string())
                .collect()
        } else {
            vec![]
        };
        self.datasets.push(Dataset {
            label: label.into(),
            values,
            style: DatasetStyle {
                color,
                point_colors,
                dashed: false,
            },
        });
        self
    }

    /// Appends a dashed dataset in the colour of dataset `like`.
    #[must_use]
    pub fn with_dashed_dataset(
        mut self,
        label: impl Into<String>,
        values: Vec<f64>,
        like: usize,
    ) -> Self {
        self.datasets.push(Dataset {
            label: label.into(),
            values,
            style: DatasetStyle {
                color: palette_color(like).to_string(),
                point_colors: vec![],
                dashed: true,
            },
        });
        self
    }

    /// Whether the chart has nothing to plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.iter().all(|d| d.values.is_empty())
    }
}

/// Labels and values of one metric across rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Chart label of a row: `"<project> · <room label>"`.
#[must_use]
pub fn row_label(row: &Row) -> String {
    format!("{} · {}", row.project, row.room.label())
}

/// One point per row. Charts cannot plot gaps, so rows without the
/// metric contribute `0` here; tables keep showing them as absent.
#[must_use]
pub fn to_chart_series(rows: &[Row], metric: Metric) -> ChartSeries {
    ChartSeries {
        labels: rows.iter().map(row_label).collect(),
        values: rows.iter().map(|r| r.get(metric).unwrap_or(0.0)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use realty_dash_market_models::RoomKey;

    fn row(project: &str, room: &str, area: Option<f64>) -> Row {
        Row {
            project: project.to_string(),
            room: RoomKey::normalize(room),
            values: area
                .map(|a| BTreeMap::from([(Metric::AverageArea, a)]))
                .unwrap_or_default(),
        }
    }

    #[test]
    fn series_zero_fills_missing_values() {
        let rows = [row("A", "Studio", Some(25.0)), row("B", "2-room", None)];
        let series = to_chart_series(&rows, Metric::AverageArea);
        assert_eq!(series.labels, ["A · Студия", "B · 2-к"]);
        assert_eq!(series.values, [25.0, 0.0]);
    }

    #[test]
    fn serializes_camel_case_with_palette() {
        let chart = ChartData::new(ChartKind::Pie, "Доли", vec!["a".into(), "b".into()])
            .with_dataset("Программы", vec![1.0, 3.0]);
        let json = serde_json::to_value(&chart).unwrap();

        assert_eq!(json["kind"], "pie");
        assert_eq!(json["datasets"][0]["style"]["color"], "#1a73e8");
        assert_eq!(json["datasets"][0]["style"]["pointColors"][1], "#34a853");
        assert!(json["datasets"][0]["style"].get("dashed").is_none());
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_color(0), "#1a73e8");
        assert_eq!(palette_color(PALETTE.len() + 3), "#fbbc04");
    }

    #[test]
    fn empty_chart() {
        assert!(ChartData::new(ChartKind::Bar, "x", vec![]).is_empty());
    }
}
