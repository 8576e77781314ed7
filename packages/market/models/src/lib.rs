#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Snapshot data model for the real-estate dashboard.
//!
//! A snapshot is a list of residential projects (ЖК). Each project maps
//! apartment-type keys to pricing metrics, with optional change blocks,
//! historical lookbacks, mortgage figures, forecasts, promotions and floor
//! breakdowns. Every numeric field is optional: absence means "unknown",
//! never zero, and consumers must filter it out of aggregates.
//!
//! The field names mirror the JSON export one-to-one (`snake_case`).

pub mod room;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use room::{RoomKey, RoomType, UNKNOWN_ROOM_RANK, merge_by_room};

/// Down payment share assumed when a project carries no mortgage config.
pub const DEFAULT_DOWN_PAYMENT_PERCENT: f64 = 30.0;

/// The full dashboard snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootData {
    /// All projects in snapshot order.
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Export timestamp as written by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl RootData {
    /// Finds a project by its `jk_name`.
    #[must_use]
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.jk_name == name)
    }

    /// Project names in snapshot order.
    #[must_use]
    pub fn project_names(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.jk_name.as_str()).collect()
    }

    /// Parses `last_updated` as RFC 3339 or a bare `YYYY-MM-DD` date.
    #[must_use]
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_updated.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// One residential development.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project name.
    pub jk_name: String,
    /// Metrics keyed by the raw apartment-type key (canonical or legacy).
    #[serde(default)]
    pub apartments_by_type: BTreeMap<String, ApartmentTypeMetrics>,
    /// Floor number (as a string) to raw room key to per-floor stats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_breakdown: Option<BTreeMap<String, BTreeMap<String, FloorTypeStats>>>,
    /// Active marketing programs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotions: Option<Vec<Promotion>>,
    /// Monthly average price history keyed by `YYYY-MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_dynamics: Option<BTreeMap<String, PriceDynamicsPoint>>,
    /// Mortgage parameters specific to this project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_config: Option<MortgageConfig>,
}

impl Project {
    /// Iterates the apartment types with normalized keys, in canonical
    /// order.
    ///
    /// When a project carries both a canonical key and its legacy alias
    /// (e.g. `studio` and `Studio`), the canonical entry wins so that
    /// `(project, room type)` stays unique.
    #[must_use]
    pub fn apartments(&self) -> Vec<(RoomKey, &ApartmentTypeMetrics)> {
        merge_by_room(
            self.apartments_by_type
                .iter()
                .map(|(raw, metrics)| (raw.as_str(), metrics)),
        )
        .into_iter()
        .collect()
    }

    /// Looks up the metrics for a normalized key.
    #[must_use]
    pub fn apartment(&self, key: &RoomKey) -> Option<&ApartmentTypeMetrics> {
        self.apartments()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, metrics)| metrics)
    }

    /// Down payment share for this project, falling back to
    /// [`DEFAULT_DOWN_PAYMENT_PERCENT`].
    #[must_use]
    pub fn down_payment_percent(&self, default_percent: f64) -> f64 {
        self.mortgage_config
            .as_ref()
            .and_then(|c| c.down_payment_percent)
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(default_percent)
    }
}

/// Metrics for one apartment type within a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApartmentTypeMetrics {
    /// Current snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_metrics: Option<CurrentMetrics>,
    /// Change over the last week.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_change: Option<ChangeBlock>,
    /// Change over the last two weeks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biweekly_change: Option<ChangeBlock>,
    /// Change over the last month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_change: Option<ChangeBlock>,
    /// Change over the last quarter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarterly_change: Option<ChangeBlock>,
    /// Price-per-area lookbacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_sqm_prices: Option<HistoricalSqmPrices>,
    /// Mortgage payment figures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_calculation: Option<MortgageCalculation>,
    /// Price forecasts keyed by month (`YYYY-MM`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_prediction: Option<BTreeMap<String, ForecastMonth>>,
    /// Lots removed from sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub washout_analysis: Option<WashoutAnalysis>,
}

/// Current snapshot for one apartment type. Areas are in m², lot prices
/// in millions of roubles and per-area prices in thousands of roubles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentMetrics {
    #[serde(default)]
    pub apartment_count: Option<f64>,
    #[serde(default)]
    pub min_area: Option<f64>,
    #[serde(default)]
    pub average_area: Option<f64>,
    #[serde(default)]
    pub max_area: Option<f64>,
    #[serde(default)]
    pub min_lot_price_mln: Option<f64>,
    #[serde(default)]
    pub average_lot_price_mln: Option<f64>,
    #[serde(default)]
    pub max_lot_price_mln: Option<f64>,
    #[serde(default)]
    pub min_sqm_price_ths: Option<f64>,
    #[serde(default)]
    pub average_sqm_price_ths: Option<f64>,
    #[serde(default)]
    pub max_sqm_price_ths: Option<f64>,
}

/// Percentage and absolute deltas over one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeBlock {
    #[serde(default)]
    pub sqm_price_change_percent: Option<f64>,
    #[serde(default)]
    pub lot_price_change_percent: Option<f64>,
    #[serde(default)]
    pub area_change_percent: Option<f64>,
    #[serde(default)]
    pub payment_change_percent: Option<f64>,
    #[serde(default)]
    pub sqm_price_change_ths: Option<f64>,
    #[serde(default)]
    pub lot_price_change_mln: Option<f64>,
    #[serde(default)]
    pub area_change: Option<f64>,
    #[serde(default)]
    pub monthly_payment_change_ths: Option<f64>,
    #[serde(default)]
    pub monthly_payment_change_percent: Option<f64>,
}

/// Price-per-area values 1, 3 and 6 months back, with the matching
/// percentage changes to today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSqmPrices {
    #[serde(default)]
    pub one_month_ago_ths: Option<f64>,
    #[serde(default)]
    pub three_months_ago_ths: Option<f64>,
    #[serde(default)]
    pub six_months_ago_ths: Option<f64>,
    #[serde(default)]
    pub one_month_change_percent: Option<f64>,
    #[serde(default)]
    pub three_months_change_percent: Option<f64>,
    #[serde(default)]
    pub six_months_change_percent: Option<f64>,
}

/// Monthly mortgage payment figures, in thousands of roubles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageCalculation {
    #[serde(default)]
    pub current_monthly_payment_ths: Option<f64>,
    #[serde(default)]
    pub min_monthly_payment_ths: Option<f64>,
    #[serde(default)]
    pub max_monthly_payment_ths: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_change: Option<PaymentChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biweekly_change: Option<PaymentChange>,
}

/// A payment delta over one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentChange {
    #[serde(default)]
    pub percent_change: Option<f64>,
    #[serde(default)]
    pub absolute_change_ths: Option<f64>,
}

/// Forecast for one future month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastMonth {
    /// Human label for the month; the map key is used when absent.
    #[serde(default)]
    pub month_label: Option<String>,
    #[serde(default)]
    pub average_predicted_lot_price_mln: Option<f64>,
    #[serde(default)]
    pub predicted_lot_price_range_mln: Option<PriceRange>,
    #[serde(default)]
    pub average_predicted_sqm_price_ths: Option<f64>,
    #[serde(default)]
    pub predicted_sqm_price_range_ths: Option<PriceRange>,
    #[serde(default)]
    pub expected_growth_percent: Option<f64>,
    #[serde(default)]
    pub prediction_accuracy_percent: Option<f64>,
}

/// Pessimistic/optimistic bounds of a forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub pessimistic: Option<f64>,
    #[serde(default)]
    pub optimistic: Option<f64>,
}

/// Lots withdrawn from sale (sold or pulled) over the reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WashoutAnalysis {
    #[serde(default)]
    pub washed_out_count: Option<f64>,
}

/// Per-floor statistics for one apartment type. `average_price` is in
/// roubles, unlike the per-type metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorTypeStats {
    #[serde(default)]
    pub count: Option<f64>,
    #[serde(default)]
    pub average_area: Option<f64>,
    #[serde(default)]
    pub average_price: Option<f64>,
}

/// A marketing program (mortgage offer, installment plan, discount, …).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Average price for one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceDynamicsPoint {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub average_sqm_price_ths: Option<f64>,
}

/// Mortgage parameters configured per project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageConfig {
    #[serde(default)]
    pub down_payment_percent: Option<f64>,
}
