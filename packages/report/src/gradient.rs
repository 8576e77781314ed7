//! Diverging colour scale for deviation columns.
//!
//! Intensity is the magnitude of a value relative to the largest magnitude
//! in its column, floored at 0.1 so that small deviations stay visible.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

const MIN_OPACITY: f64 = 0.1;
const DARK_BACKGROUND_OPACITY: f64 = 0.7;

/// Text colour on light backgrounds.
pub const DARK_TEXT: &str = "#202124";
/// Text colour on saturated backgrounds.
pub const LIGHT_TEXT: &str = "#ffffff";

/// Which side of the market a value falls on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Hue {
    /// Negative deviation, drawn in red.
    BelowMarket,
    /// Zero or positive deviation, drawn in blue.
    AboveMarket,
}

impl Hue {
    /// RGB components of the hue.
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::BelowMarket => (217, 48, 37),
            Self::AboveMarket => (26, 115, 232),
        }
    }

    /// Marker used where colour is unavailable.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::BelowMarket => '▼',
            Self::AboveMarket => '▲',
        }
    }
}

/// Colour of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub hue: Hue,
    /// In `[0.1, 1.0]`.
    pub opacity: f64,
}

impl Gradient {
    /// CSS background colour.
    #[must_use]
    pub fn background(&self) -> String {
        let (r, g, b) = self.hue.rgb();
        format!("rgba({r}, {g}, {b}, {:.2})", self.opacity)
    }

    /// CSS text colour readable on [`Self::background`].
    #[must_use]
    pub fn text_color(&self) -> &'static str {
        if self.opacity > DARK_BACKGROUND_OPACITY {
            LIGHT_TEXT
        } else {
            DARK_TEXT
        }
    }

    /// Both colours, ready to attach to a cell.
    #[must_use]
    pub fn style(&self) -> CellStyle {
        CellStyle {
            background: self.background(),
            color: self.text_color().to_string(),
        }
    }
}

/// Inline style hints for a coloured cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    pub background: String,
    pub color: String,
}

/// Largest finite magnitude in `column`.
#[must_use]
pub fn max_abs(column: &[Option<f64>]) -> Option<f64> {
    column
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .map(|v| v.abs())
        .reduce(f64::max)
}

/// Colour for `value` within `column`.
///
/// `None` when the value is absent or not finite, when the column has no
/// finite value, or when every value in it is zero.
#[must_use]
pub fn gradient_intensity(value: Option<f64>, column: &[Option<f64>]) -> Option<Gradient> {
    let value = value.filter(|v| v.is_finite())?;
    let max = max_abs(column).filter(|m| *m > 0.0)?;

    Some(Gradient {
        hue: if value < 0.0 {
            Hue::BelowMarket
        } else {
            Hue::AboveMarket
        },
        opacity: (value.abs() / max).clamp(MIN_OPACITY, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_magnitude_is_fully_opaque() {
        let column = [Some(-10.0), Some(5.0), None, Some(f64::NAN)];
        let g = gradient_intensity(Some(-10.0), &column).unwrap();
        assert_eq!(g.hue, Hue::BelowMarket);
        assert!((g.opacity - 1.0).abs() < 1e-9);
        assert_eq!(g.background(), "rgba(217, 48, 37, 1.00)");
        assert_eq!(g.text_color(), LIGHT_TEXT);

        let g = gradient_intensity(Some(5.0), &column).unwrap();
        assert_eq!(g.hue, Hue::AboveMarket);
        assert!((g.opacity - 0.5).abs() < 1e-9);
        assert_eq!(g.text_color(), DARK_TEXT);
    }

    #[test]
    fn opacity_is_floored() {
        let column = [Some(100.0), Some(0.0)];
        let g = gradient_intensity(Some(0.0), &column).unwrap();
        assert!((g.opacity - 0.1).abs() < 1e-9);
        assert_eq!(g.hue, Hue::AboveMarket);
    }

    #[test]
    fn opacity_is_monotonic_in_magnitude() {
        let column: Vec<Option<f64>> = (-20..=20).map(|v| Some(f64::from(v))).collect();
        let mut last = 0.0;
        for v in 0..=20 {
            let g = gradient_intensity(Some(f64::from(v)), &column).unwrap();
            assert!(g.opacity >= last);
            last = g.opacity;
        }
    }

    #[test]
    fn degenerate_columns_have_no_colour() {
        assert_eq!(gradient_intensity(Some(1.0), &[]), None);
        assert_eq!(gradient_intensity(Some(0.0), &[Some(0.0), Some(0.0)]), None);
        assert_eq!(gradient_intensity(None, &[Some(3.0)]), None);
        assert_eq!(gradient_intensity(Some(f64::NAN), &[Some(3.0)]), None);
    }
}
