//! Reductions over optional values.
//!
//! Every reduction skips absent and non-finite inputs instead of treating
//! them as zero.

use realty_dash_analytics_models::Stats;

/// Arithmetic mean of the finite values, or `None` when there are none.
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    summarize(values).map(|s| s.mean)
}

/// Sum of the finite values, or `None` when there are none.
#[must_use]
pub fn sum<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    summarize(values).map(|s| s.sum)
}

/// Count, sum, min, max and mean of the finite values.
#[must_use]
pub fn summarize<I>(values: I) -> Option<Stats>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut stats: Option<Stats> = None;

    for v in values.into_iter().flatten().filter(|v| v.is_finite()) {
        stats = Some(match stats {
            None => Stats {
                count: 1,
                sum: v,
                min: v,
                max: v,
                mean: v,
            },
            Some(s) => Stats {
                count: s.count + 1,
                sum: s.sum + v,
                min: s.min.min(v),
                max: s.max.max(v),
                mean: 0.0,
            },
        });
    }

    stats.map(|mut s| {
        #[allow(clippy::cast_precision_loss)]
        let n = s.count as f64;
        s.mean = s.sum / n;
        s
    })
}
