#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Presentation layer of the real-estate dashboard.
//!
//! Turns the rows and derivations of `realty_dash_analytics` into what a
//! dashboard shows: locale-formatted numbers, diverging colour gradients
//! for deviation columns, project-grouped tables, chart payloads and one
//! [`ReportView`] per dashboard page. Every view takes the selection state
//! explicitly, so rendering is a pure function of snapshot and state.

pub mod chart;
pub mod format;
pub mod gradient;
pub mod group;
pub mod state;
pub mod table;
pub mod views;

pub use chart::{ChartData, ChartKind, ChartSeries, to_chart_series};
pub use format::{MISSING, fmt_delta, fmt_num, fmt_signed};
pub use gradient::{Gradient, Hue, gradient_intensity};
pub use group::{ExpandedGroups, ProjectGroup, group_by_project};
pub use state::DashboardState;
pub use table::{Cell, Column, NO_DATA, Table};
pub use views::{Kpi, ReportView, View, render_view};

/// Errors produced while rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The selected project is not in the snapshot.
    #[error("Unknown project: {0}")]
    UnknownProject(String),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}
