//! Per-floor breakdown of a project's lots.

use std::collections::BTreeMap;

use realty_dash_analytics_models::{FloorDetail, FloorRow};
use realty_dash_market_models::{FloorTypeStats, Project, RoomKey, merge_by_room};

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

/// Floors with their normalized per-type stats, highest floor first.
///
/// Floor keys that are not integers are skipped. When a floor lists both a
/// canonical room key and its legacy alias, the canonical entry wins.
fn floors(project: &Project) -> Vec<(i32, BTreeMap<RoomKey, &FloorTypeStats>)> {
    let Some(breakdown) = project.floor_breakdown.as_ref() else {
        return vec![];
    };

    let mut by_floor: BTreeMap<i32, Vec<(&str, &FloorTypeStats)>> = BTreeMap::new();

    for (raw_floor, types) in breakdown {
        let Ok(floor) = raw_floor.trim().parse::<i32>() else {
            log::trace!("skipping floor key {raw_floor:?} of {}", project.jk_name);
            continue;
        };
        by_floor
            .entry(floor)
            .or_default()
            .extend(types.iter().map(|(raw, stats)| (raw.as_str(), stats)));
    }

    by_floor
        .into_iter()
        .rev()
        .map(|(floor, types)| (floor, merge_by_room(types)))
        .collect()
}

/// Lot counts per apartment type on every floor, highest floor first.
/// Types without a count on a floor have no entry.
#[must_use]
pub fn floor_distribution(project: &Project) -> Vec<FloorRow> {
    floors(project)
        .into_iter()
        .map(|(floor, types)| FloorRow {
            floor,
            counts: types
                .into_iter()
                .filter_map(|(key, stats)| finite(stats.count).map(|c| (key, c)))
                .collect(),
        })
        .collect()
}

/// Per-floor, per-type areas and prices, highest floor first and types in
/// canonical order within a floor.
///
/// The price per m² (thousands of roubles) is the average price over the
/// average area; the lot price is in millions. Both are absent when an
/// input is missing or the area is not positive.
#[must_use]
pub fn floor_details(project: &Project) -> Vec<FloorDetail> {
    floors(project)
        .into_iter()
        .flat_map(|(floor, types)| {
            types.into_iter().map(move |(room, stats)| {
                let area = finite(stats.average_area);
                let price = finite(stats.average_price);
                let sqm_price = match (price, area) {
                    (Some(price), Some(area)) if area > 0.0 => Some(price / area / 1000.0),
                    _ => None,
                };
                FloorDetail {
                    floor,
                    room,
                    count: finite(stats.count),
                    average_area: area,
                    sqm_price,
                    lot_price: price.map(|p| p / 1_000_000.0),
                }
            })
        })
        .collect()
}
