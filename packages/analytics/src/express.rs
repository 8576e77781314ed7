//! Market parameters today compared with two and four weeks ago.
//!
//! Snapshots carry no earlier values, only the recorded changes. An
//! earlier value is recovered from today's value and the percentage
//! change since then: `before = today / (1 + pct / 100)`.

use realty_dash_analytics_models::{
    ChangeField, ChangePeriod, ExpressPoint, Metric, Parameter, RowQuery, Unit,
};
use realty_dash_market_models::{ApartmentTypeMetrics, Project};

use crate::sort::compare_names;
use crate::stats::mean;

/// Value before a change of `pct` percent that led to `today`.
#[must_use]
pub fn value_before(today: Option<f64>, pct: Option<f64>) -> Option<f64> {
    let factor = 1.0 + pct? / 100.0;
    if factor == 0.0 {
        return None;
    }
    Some(today? / factor).filter(|v| v.is_finite())
}

/// Percentage change of `parameter` over `period` for one apartment type.
///
/// Payments prefer the mortgage block's own two-week change.
fn change_pct(
    parameter: Parameter,
    period: ChangePeriod,
    project: &Project,
    apartment: &ApartmentTypeMetrics,
    query: &RowQuery,
) -> Option<f64> {
    let field = parameter.field(Unit::Pct);
    let recorded = Metric::Change(period, field).value(project, apartment, &query.settings);

    if field == ChangeField::PaymentPct && period == ChangePeriod::Biweekly {
        let own = apartment
            .mortgage_calculation
            .as_ref()
            .and_then(|m| m.biweekly_change.as_ref())
            .and_then(|c| c.percent_change)
            .filter(|v| v.is_finite());
        return own.or(recorded);
    }
    recorded
}

/// Per project, the mean of `parameter` today, two weeks ago and a month
/// ago over the apartment types passing `query`'s filters. Projects are
/// ordered by name.
#[must_use]
pub fn express_points(
    projects: &[Project],
    query: &RowQuery,
    parameter: Parameter,
) -> Vec<ExpressPoint> {
    let mut points: Vec<ExpressPoint> = projects
        .iter()
        .filter(|p| query.projects.matches(&p.jk_name))
        .map(|project| {
            let apartments: Vec<&ApartmentTypeMetrics> = project
                .apartments()
                .into_iter()
                .filter(|(room, _)| query.rooms.matches(room))
                .map(|(_, apartment)| apartment)
                .collect();

            let today_of =
                |a: &ApartmentTypeMetrics| parameter.current().value(project, a, &query.settings);
            let before = |period: ChangePeriod| {
                mean(apartments.iter().map(|&a| {
                    value_before(
                        today_of(a),
                        change_pct(parameter, period, project, a, query),
                    )
                }))
            };

            ExpressPoint {
                project: project.jk_name.clone(),
                today: mean(apartments.iter().map(|&a| today_of(a))),
                two_weeks_ago: before(ChangePeriod::Biweekly),
                month_ago: before(ChangePeriod::Monthly),
            }
        })
        .collect();

    points.sort_by(|a, b| compare_names(&a.project, &b.project));
    log::debug!("express points for {parameter}: {}", points.len());
    points
}
