//! Typed metric selectors.
//!
//! Each [`Metric`] variant is bound at compile time to an accessor over
//! the snapshot types, so callers never look fields up by name.

use std::str::FromStr;

use realty_dash_market_models::{ApartmentTypeMetrics, ChangeBlock, Project};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::EngineSettings;

/// Which change block of an apartment type to read.
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
pub enum ChangePeriod {
    /// `weekly_change`
    Weekly,
    /// `biweekly_change`
    Biweekly,
    /// `monthly_change`
    Monthly,
    /// `quarterly_change`
    Quarterly,
}

impl ChangePeriod {
    /// The change block for this period, if the snapshot has one.
    #[must_use]
    pub fn block(self, metrics: &ApartmentTypeMetrics) -> Option<&ChangeBlock> {
        match self {
            Self::Weekly => metrics.weekly_change.as_ref(),
            Self::Biweekly => metrics.biweekly_change.as_ref(),
            Self::Monthly => metrics.monthly_change.as_ref(),
            Self::Quarterly => metrics.quarterly_change.as_ref(),
        }
    }
}

/// Which field of a change block to read.
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
pub enum ChangeField {
    /// Price-per-area change, %.
    SqmPricePct,
    /// Lot price change, %.
    LotPricePct,
    /// Average area change, %.
    AreaPct,
    /// Monthly payment change, %.
    PaymentPct,
    /// Price-per-area change, thousands of roubles.
    SqmPriceAbs,
    /// Lot price change, millions of roubles.
    LotPriceAbs,
    /// Average area change, m².
    AreaAbs,
    /// Monthly payment change, thousands of roubles.
    PaymentAbs,
}

impl ChangeField {
    /// Reads this field from a change block.
    #[must_use]
    pub fn read(self, block: &ChangeBlock) -> Option<f64> {
        match self {
            Self::SqmPricePct => block.sqm_price_change_percent,
            Self::LotPricePct => block.lot_price_change_percent,
            Self::AreaPct => block.area_change_percent,
            Self::PaymentPct => block
                .payment_change_percent
                .or(block.monthly_payment_change_percent),
            Self::SqmPriceAbs => block.sqm_price_change_ths,
            Self::LotPriceAbs => block.lot_price_change_mln,
            Self::AreaAbs => block.area_change,
            Self::PaymentAbs => block.monthly_payment_change_ths,
        }
    }
}

/// How changes are shown: in the parameter's own units or in percent.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Unit {
    /// Roubles (or m² for areas).
    Rub,
    #[default]
    Pct,
}

/// A market parameter whose change can be tracked.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum Parameter {
    #[default]
    SqmPrice,
    LotPrice,
    Area,
    Payment,
}

impl Parameter {
    /// The change-block field holding this parameter's change in `unit`.
    #[must_use]
    pub const fn field(self, unit: Unit) -> ChangeField {
        match (self, unit) {
            (Self::SqmPrice, Unit::Pct) => ChangeField::SqmPricePct,
            (Self::SqmPrice, Unit::Rub) => ChangeField::SqmPriceAbs,
            (Self::LotPrice, Unit::Pct) => ChangeField::LotPricePct,
            (Self::LotPrice, Unit::Rub) => ChangeField::LotPriceAbs,
            (Self::Area, Unit::Pct) => ChangeField::AreaPct,
            (Self::Area, Unit::Rub) => ChangeField::AreaAbs,
            (Self::Payment, Unit::Pct) => ChangeField::PaymentPct,
            (Self::Payment, Unit::Rub) => ChangeField::PaymentAbs,
        }
    }

    /// The metric holding the parameter's current average.
    #[must_use]
    pub const fn current(self) -> Metric {
        match self {
            Self::SqmPrice => Metric::AverageSqmPrice,
            Self::LotPrice => Metric::AverageLotPrice,
            Self::Area => Metric::AverageArea,
            Self::Payment => Metric::MonthlyPayment,
        }
    }

    /// Russian label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SqmPrice => "Цена м²",
            Self::LotPrice => "Цена лота",
            Self::Area => "Площадь",
            Self::Payment => "Платёж",
        }
    }

    /// Unit suffix of the parameter's values.
    #[must_use]
    pub const fn value_unit(self) -> &'static str {
        match self {
            Self::SqmPrice | Self::Payment => "тыс. руб.",
            Self::LotPrice => "млн руб.",
            Self::Area => "м²",
        }
    }

    /// Unit suffix of the parameter's changes in `unit`.
    #[must_use]
    pub const fn change_unit(self, unit: Unit) -> &'static str {
        match unit {
            Unit::Pct => "%",
            Unit::Rub => self.value_unit(),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::SqmPrice, Self::LotPrice, Self::Area, Self::Payment]
    }
}

/// A numeric value that can be read for a `(project, apartment type)`
/// pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Metric {
    /// Lots currently on sale.
    ApartmentCount,
    MinArea,
    AverageArea,
    MaxArea,
    MinLotPrice,
    AverageLotPrice,
    MaxLotPrice,
    MinSqmPrice,
    AverageSqmPrice,
    MaxSqmPrice,
    /// Current average monthly mortgage payment.
    MonthlyPayment,
    MinMonthlyPayment,
    MaxMonthlyPayment,
    /// Average lot price times the project's down payment share, in
    /// millions of roubles.
    DownPayment,
    SqmPriceOneMonthAgo,
    SqmPriceThreeMonthsAgo,
    SqmPriceSixMonthsAgo,
    SqmPriceOneMonthChangePct,
    SqmPriceThreeMonthsChangePct,
    SqmPriceSixMonthsChangePct,
    /// A field of one of the change blocks.
    Change(ChangePeriod, ChangeField),
    /// Lots withdrawn from sale.
    WashedOutCount,
}

const SIMPLE_METRICS: &[(Metric, &str)] = &[
    (Metric::ApartmentCount, "apartment_count"),
    (Metric::MinArea, "min_area"),
    (Metric::AverageArea, "average_area"),
    (Metric::MaxArea, "max_area"),
    (Metric::MinLotPrice, "min_lot_price"),
    (Metric::AverageLotPrice, "average_lot_price"),
    (Metric::MaxLotPrice, "max_lot_price"),
    (Metric::MinSqmPrice, "min_sqm_price"),
    (Metric::AverageSqmPrice, "average_sqm_price"),
    (Metric::MaxSqmPrice, "max_sqm_price"),
    (Metric::MonthlyPayment, "monthly_payment"),
    (Metric::MinMonthlyPayment, "min_monthly_payment"),
    (Metric::MaxMonthlyPayment, "max_monthly_payment"),
    (Metric::DownPayment, "down_payment"),
    (Metric::SqmPriceOneMonthAgo, "sqm_price_1m_ago"),
    (Metric::SqmPriceThreeMonthsAgo, "sqm_price_3m_ago"),
    (Metric::SqmPriceSixMonthsAgo, "sqm_price_6m_ago"),
    (Metric::SqmPriceOneMonthChangePct, "sqm_price_1m_change_pct"),
    (Metric::SqmPriceThreeMonthsChangePct, "sqm_price_3m_change_pct"),
    (Metric::SqmPriceSixMonthsChangePct, "sqm_price_6m_change_pct"),
    (Metric::WashedOutCount, "washed_out_count"),
];

impl Metric {
    /// Reads this metric for one apartment type of `project`.
    ///
    /// Returns `None` when the value is absent or not finite.
    #[must_use]
    pub fn value(
        self,
        project: &Project,
        metrics: &ApartmentTypeMetrics,
        settings: &EngineSettings,
    ) -> Option<f64> {
        let current = metrics.current_metrics.as_ref();
        let mortgage = metrics.mortgage_calculation.as_ref();
        let history = metrics.historical_sqm_prices.as_ref();

        let raw = match self {
            Self::ApartmentCount => current.and_then(|c| c.apartment_count),
            Self::MinArea => current.and_then(|c| c.min_area),
            Self::AverageArea => current.and_then(|c| c.average_area),
            Self::MaxArea => current.and_then(|c| c.max_area),
            Self::MinLotPrice => current.and_then(|c| c.min_lot_price_mln),
            Self::AverageLotPrice => current.and_then(|c| c.average_lot_price_mln),
            Self::MaxLotPrice => current.and_then(|c| c.max_lot_price_mln),
            Self::MinSqmPrice => current.and_then(|c| c.min_sqm_price_ths),
            Self::AverageSqmPrice => current.and_then(|c| c.average_sqm_price_ths),
            Self::MaxSqmPrice => current.and_then(|c| c.max_sqm_price_ths),
            Self::MonthlyPayment => mortgage.and_then(|m| m.current_monthly_payment_ths),
            Self::MinMonthlyPayment => mortgage.and_then(|m| m.min_monthly_payment_ths),
            Self::MaxMonthlyPayment => mortgage.and_then(|m| m.max_monthly_payment_ths),
            Self::DownPayment => current.and_then(|c| c.average_lot_price_mln).map(|lot| {
                lot * project.down_payment_percent(settings.default_down_payment_percent) / 100.0
            }),
            Self::SqmPriceOneMonthAgo => history.and_then(|h| h.one_month_ago_ths),
            Self::SqmPriceThreeMonthsAgo => history.and_then(|h| h.three_months_ago_ths),
            Self::SqmPriceSixMonthsAgo => history.and_then(|h| h.six_months_ago_ths),
            Self::SqmPriceOneMonthChangePct => history.and_then(|h| h.one_month_change_percent),
            Self::SqmPriceThreeMonthsChangePct => {
                history.and_then(|h| h.three_months_change_percent)
            }
            Self::SqmPriceSixMonthsChangePct => history.and_then(|h| h.six_months_change_percent),
            Self::Change(period, field) => period.block(metrics).and_then(|b| field.read(b)),
            Self::WashedOutCount => metrics
                .washout_analysis
                .as_ref()
                .and_then(|w| w.washed_out_count),
        };

        raw.filter(|v| v.is_finite())
    }

    /// Stable machine key, e.g. `average_sqm_price` or
    /// `change.monthly.sqm_price_pct`.
    #[must_use]
    pub fn key(self) -> String {
        if let Self::Change(period, field) = self {
            return format!("change.{period}.{field}");
        }
        SIMPLE_METRICS
            .iter()
            .find(|(m, _)| *m == self)
            .map_or_else(String::new, |(_, key)| (*key).to_string())
    }

    /// Russian column label.
    #[must_use]
    pub fn label(self) -> String {
        let label = match self {
            Self::ApartmentCount => "Лотов, шт.",
            Self::MinArea => "Площадь мин., м²",
            Self::AverageArea => "Площадь ср., м²",
            Self::MaxArea => "Площадь макс., м²",
            Self::MinLotPrice => "Цена лота мин., млн",
            Self::AverageLotPrice => "Цена лота ср., млн",
            Self::MaxLotPrice => "Цена лота макс., млн",
            Self::MinSqmPrice => "Цена м² мин., тыс.",
            Self::AverageSqmPrice => "Цена м² ср., тыс.",
            Self::MaxSqmPrice => "Цена м² макс., тыс.",
            Self::MonthlyPayment => "Платёж ср., тыс.",
            Self::MinMonthlyPayment => "Платёж мин., тыс.",
            Self::MaxMonthlyPayment => "Платёж макс., тыс.",
            Self::DownPayment => "ПВ, млн",
            Self::SqmPriceOneMonthAgo => "Цена м² месяц назад",
            Self::SqmPriceThreeMonthsAgo => "Цена м² квартал назад",
            Self::SqmPriceSixMonthsAgo => "Цена м² полгода назад",
            Self::SqmPriceOneMonthChangePct => "Изм. за месяц, %",
            Self::SqmPriceThreeMonthsChangePct => "Изм. за квартал, %",
            Self::SqmPriceSixMonthsChangePct => "Изм. за полгода, %",
            Self::WashedOutCount => "Вымываемость, шт.",
            Self::Change(period, field) => return format!("{field} ({period})"),
        };
        label.to_string()
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// Error returned when a metric key cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetricError {
    /// The key that failed to parse.
    pub key: String,
}

impl std::fmt::Display for UnknownMetricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown metric '{}'", self.key)
    }
}

impl std::error::Error for UnknownMetricError {}

impl FromStr for Metric {
    type Err = UnknownMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownMetricError { key: s.to_string() };

        if let Some(rest) = s.strip_prefix("change.") {
            let (period, field) = rest.split_once('.').ok_or_else(unknown)?;
            let period = ChangePeriod::from_str(period).map_err(|_| unknown())?;
            let field = ChangeField::from_str(field).map_err(|_| unknown())?;
            return Ok(Self::Change(period, field));
        }

        SIMPLE_METRICS
            .iter()
            .find(|(_, key)| *key == s)
            .map(|(m, _)| *m)
            .ok_or_else(unknown)
    }
}

impl From<Metric> for String {
    fn from(metric: Metric) -> Self {
        metric.key()
    }
}

impl TryFrom<String> for Metric {
    type Error = UnknownMetricError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}
