#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Market-deviation aggregation engine.
//!
//! Takes a list of projects and computes, per `(project, apartment type)`
//! pair, the requested metrics, the market ("KO") baseline of each metric
//! and the deviation of every row from it. On top of that sit the
//! per-report derivations: period changes, mortgage payment history,
//! forecasts, promotions, floor breakdowns, express comparisons, price
//! dynamics and lot totals.
//!
//! Everything here is pure and synchronous. Missing data never errors; it
//! propagates as `None` and is excluded from every aggregate.

pub mod baseline;
pub mod deviation;
pub mod dynamics;
pub mod express;
pub mod floors;
pub mod forecast;
pub mod mortgage;
pub mod periods;
pub mod promotions;
pub mod rows;
pub mod sort;
pub mod stats;
pub mod summary;

#[cfg(test)]
mod test_support;

pub use baseline::{baselines_by_room_type, compute_baseline, room_types};
pub use deviation::compute_deviation;
pub use dynamics::{average_change, overall_change, price_dynamics_series};
pub use express::{express_points, value_before};
pub use floors::{floor_details, floor_distribution};
pub use forecast::{forecast_months, forecast_rows};
pub use mortgage::{down_payment, payment_history};
pub use periods::period_change;
pub use promotions::{OTHER_PROMOTION_KIND, promotion_distribution, promotion_rows};
pub use rows::{build_rows, compare_to_market, compute_row};
pub use sort::{compare_rows, sort_rows};
pub use stats::summarize;
pub use summary::{all_project_totals, project_totals};
