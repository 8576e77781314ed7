//! Market baseline ("KO", competitive environment).
//!
//! The baseline of a metric is the mean of every defined value of that
//! metric across all `(project, normalized room type)` pairs that pass the
//! room filter. It is derived on demand and never stored.

use std::collections::BTreeMap;

use realty_dash_analytics_models::{EngineSettings, Metric, RoomFilter};
use realty_dash_market_models::{Project, RoomKey};

use crate::stats::mean;

/// Collects the defined values of `metric` across the market.
fn market_values<'a>(
    projects: &'a [Project],
    metric: Metric,
    rooms: &'a RoomFilter,
    settings: &'a EngineSettings,
) -> impl Iterator<Item = (RoomKey, Option<f64>)> + 'a {
    projects.iter().flat_map(move |project| {
        project
            .apartments()
            .into_iter()
            .filter(move |(key, _)| rooms.matches(key))
            .map(move |(key, metrics)| (key, metric.value(project, metrics, settings)))
    })
}

/// Mean of `metric` over the market, or `None` when no pair has a
/// defined value.
#[must_use]
pub fn compute_baseline(
    projects: &[Project],
    metric: Metric,
    rooms: &RoomFilter,
    settings: &EngineSettings,
) -> Option<f64> {
    let baseline = mean(market_values(projects, metric, rooms, settings).map(|(_, v)| v));
    log::trace!("baseline {metric}: {baseline:?}");
    baseline
}

/// Baseline of `metric` computed separately for each apartment type.
///
/// Types without any defined value are left out.
#[must_use]
pub fn baselines_by_room_type(
    projects: &[Project],
    metric: Metric,
    settings: &EngineSettings,
) -> BTreeMap<RoomKey, f64> {
    let all = RoomFilter::all();
    let mut by_room: BTreeMap<RoomKey, Vec<Option<f64>>> = BTreeMap::new();

    for (key, value) in market_values(projects, metric, &all, settings) {
        by_room.entry(key).or_default().push(value);
    }

    by_room
        .into_iter()
        .filter_map(|(key, values)| mean(values).map(|m| (key, m)))
        .collect()
}

/// Distinct normalized apartment types present in the snapshot, in
/// canonical order.
#[must_use]
pub fn room_types(projects: &[Project]) -> Vec<RoomKey> {
    let mut keys: Vec<RoomKey> = projects
        .iter()
        .flat_map(|p| p.apartments().into_iter().map(|(key, _)| key))
        .collect();
    keys.sort();
    keys.dedup();
    keys
}
