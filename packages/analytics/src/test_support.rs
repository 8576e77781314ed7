//! Fixture builders shared by the engine's unit tests.

use realty_dash_market_models::{ApartmentTypeMetrics, CurrentMetrics, Project};

pub fn project(name: &str, types: &[(&str, ApartmentTypeMetrics)]) -> Project {
    Project {
        jk_name: name.to_string(),
        apartments_by_type: types
            .iter()
            .map(|(key, metrics)| ((*key).to_string(), metrics.clone()))
            .collect(),
        ..Project::default()
    }
}

pub fn with_current(current: CurrentMetrics) -> ApartmentTypeMetrics {
    ApartmentTypeMetrics {
        current_metrics: Some(current),
        ..ApartmentTypeMetrics::default()
    }
}

pub fn with_area(area: Option<f64>) -> ApartmentTypeMetrics {
    with_current(CurrentMetrics {
        average_area: area,
        ..CurrentMetrics::default()
    })
}

pub fn with_prices(area: f64, lot_mln: f64, sqm_ths: f64) -> ApartmentTypeMetrics {
    with_current(CurrentMetrics {
        apartment_count: Some(10.0),
        average_area: Some(area),
        average_lot_price_mln: Some(lot_mln),
        average_sqm_price_ths: Some(sqm_ths),
        ..CurrentMetrics::default()
    })
}
