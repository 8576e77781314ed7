#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input and output types for the market aggregation engine.
//!
//! Defines the metric selectors, the room-type and project filters, and
//! the records the engine produces: flat per-(project, room type) rows,
//! deviations from the market baseline, summary statistics and the
//! per-report derivations (forecasts, promotions, floors, dynamics).

pub mod metric;

use std::collections::{BTreeMap, BTreeSet};

use realty_dash_market_models::{DEFAULT_DOWN_PAYMENT_PERCENT, RoomKey};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use metric::{ChangeField, ChangePeriod, Metric, Parameter, Unit, UnknownMetricError};

/// Engine-wide knobs that are not part of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    /// Down payment share (%) for projects without a mortgage config.
    pub default_down_payment_percent: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_down_payment_percent: DEFAULT_DOWN_PAYMENT_PERCENT,
        }
    }
}

/// Restricts which apartment types take part in a computation. An empty
/// selection means every type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFilter {
    rooms: BTreeSet<RoomKey>,
}

impl RoomFilter {
    /// Matches every apartment type.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches only the given types. Keys are normalized, so legacy
    /// aliases select their canonical type.
    #[must_use]
    pub fn only<I, K>(rooms: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<RoomKey>,
    {
        Self {
            rooms: rooms.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `key` passes the filter.
    #[must_use]
    pub fn matches(&self, key: &RoomKey) -> bool {
        self.rooms.is_empty() || self.rooms.contains(key)
    }

    /// Whether the filter lets everything through.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Restricts which projects take part in a computation. An empty
/// selection means every project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    names: BTreeSet<String>,
}

impl ProjectFilter {
    /// Matches every project.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches only the named projects.
    #[must_use]
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the project named `name` passes the filter.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }
}

/// What to compute rows for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowQuery {
    /// Metrics to read for every row.
    pub metrics: Vec<Metric>,
    /// Apartment types to include.
    pub rooms: RoomFilter,
    /// Projects to include.
    pub projects: ProjectFilter,
    /// Engine settings.
    pub settings: EngineSettings,
}

impl RowQuery {
    /// A query over every project and type for `metrics`.
    #[must_use]
    pub fn new(metrics: impl Into<Vec<Metric>>) -> Self {
        Self {
            metrics: metrics.into(),
            ..Self::default()
        }
    }

    /// Narrows the query to some apartment types.
    #[must_use]
    pub fn with_rooms(mut self, rooms: RoomFilter) -> Self {
        self.rooms = rooms;
        self
    }

    /// Narrows the query to some projects.
    #[must_use]
    pub fn with_projects(mut self, projects: ProjectFilter) -> Self {
        self.projects = projects;
        self
    }

    /// Replaces the engine settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// One `(project, apartment type)` pair with the defined subset of the
/// requested metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Project name.
    pub project: String,
    /// Normalized apartment type.
    pub room: RoomKey,
    /// Metric values; absent metrics have no entry.
    pub values: BTreeMap<Metric, f64>,
}

impl Row {
    /// The value of `metric`, if defined.
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }
}

/// How far a value sits from the market baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deviation {
    /// `value - baseline`, when both are defined.
    pub abs: Option<f64>,
    /// `abs / baseline * 100`, when the baseline is defined and non-zero.
    pub pct: Option<f64>,
}

/// A row paired with its deviation from the baseline of each metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparedRow {
    /// The underlying row.
    pub row: Row,
    /// Deviation per requested metric.
    pub deviations: BTreeMap<Metric, Deviation>,
}

impl ComparedRow {
    /// Deviation for `metric`; all-absent when the metric was not
    /// requested.
    #[must_use]
    pub fn deviation(&self, metric: Metric) -> Deviation {
        self.deviations.get(&metric).copied().unwrap_or_default()
    }
}

/// Rows compared against the market ("KO") baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketComparison {
    /// Baseline per requested metric; `None` when nothing was defined.
    pub baselines: BTreeMap<Metric, Option<f64>>,
    /// Sorted rows with their deviations.
    pub rows: Vec<ComparedRow>,
}

impl MarketComparison {
    /// The baseline of `metric`, if defined.
    #[must_use]
    pub fn baseline(&self, metric: Metric) -> Option<f64> {
        self.baselines.get(&metric).copied().flatten()
    }
}

/// Summary statistics over the defined values of a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Reporting period for change comparisons.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Period {
    Week,
    Month,
    Quarter,
    HalfYear,
}

impl Period {
    /// Russian label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Week => "Неделя",
            Self::Month => "Месяц",
            Self::Quarter => "Квартал",
            Self::HalfYear => "Полгода",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Week, Self::Month, Self::Quarter, Self::HalfYear]
    }
}

/// A change over a [`Period`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodChange {
    /// The change, if it could be read or estimated.
    pub value: Option<f64>,
    /// `true` when the value was extrapolated linearly from a shorter
    /// period instead of read from recorded history.
    pub estimated: bool,
}

/// Mortgage payment today and estimated for earlier periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistory {
    /// Current monthly payment, thousands of roubles.
    pub current: Option<f64>,
    /// Estimated payment a month ago.
    pub month_ago: Option<f64>,
    /// Payment change over a month (abs and %).
    pub month: Deviation,
    /// Payment change over a quarter (abs and %), extrapolated.
    pub quarter: Deviation,
    /// Payment change over half a year (abs and %), extrapolated.
    pub half_year: Deviation,
}

/// Forecast for one month of one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Month key (`YYYY-MM`).
    pub month: String,
    /// Display label.
    pub label: String,
    pub lot_price: Option<f64>,
    pub lot_price_pessimistic: Option<f64>,
    pub lot_price_optimistic: Option<f64>,
    pub sqm_price: Option<f64>,
    pub sqm_price_pessimistic: Option<f64>,
    pub sqm_price_optimistic: Option<f64>,
    pub growth_percent: Option<f64>,
    pub accuracy_percent: Option<f64>,
}

/// Forecasts of one `(project, apartment type)` pair, sorted by month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRow {
    pub project: String,
    pub room: RoomKey,
    pub predictions: Vec<ForecastPoint>,
}

/// One marketing program of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRow {
    pub project: String,
    pub kind: String,
    pub description: String,
}

/// Share of one promotion type among all listed programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionShare {
    pub kind: String,
    pub count: usize,
    pub percent: f64,
}

/// Lot counts per apartment type on one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorRow {
    pub floor: i32,
    pub counts: BTreeMap<RoomKey, f64>,
}

/// Per-floor, per-type prices derived from the floor breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDetail {
    pub floor: i32,
    pub room: RoomKey,
    pub count: Option<f64>,
    pub average_area: Option<f64>,
    /// Thousands of roubles per m².
    pub sqm_price: Option<f64>,
    /// Millions of roubles.
    pub lot_price: Option<f64>,
}

/// One month of a project's price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicsPoint {
    /// Month key (`YYYY-MM`).
    pub month: String,
    /// Display label, e.g. `Март 2025`.
    pub label: String,
    pub average_sqm_price: Option<f64>,
}

/// Average change of one apartment type over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomChange {
    pub room: RoomKey,
    pub change: PeriodChange,
}

/// A project's average of a parameter today and as implied by its
/// recorded two-week and monthly changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressPoint {
    pub project: String,
    pub today: Option<f64>,
    pub two_weeks_ago: Option<f64>,
    pub month_ago: Option<f64>,
}

/// Lots on sale and washed out, summed across a project's types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTotals {
    pub project: String,
    pub on_sale: Option<f64>,
    pub washed_out: Option<f64>,
}
