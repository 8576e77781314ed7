//! Lot totals per project.

use realty_dash_analytics_models::{EngineSettings, Metric, ProjectFilter, ProjectTotals};
use realty_dash_market_models::Project;

use crate::sort::compare_names;
use crate::stats::sum;

/// Lots on sale and washed out, summed over the project's apartment
/// types. Each total is absent when no type defines it.
#[must_use]
pub fn project_totals(project: &Project) -> ProjectTotals {
    let settings = EngineSettings::default();
    let apartments = project.apartments();
    let total = |metric: Metric| {
        sum(apartments
            .iter()
            .map(|(_, apartment)| metric.value(project, apartment, &settings)))
    };

    ProjectTotals {
        project: project.jk_name.clone(),
        on_sale: total(Metric::ApartmentCount),
        washed_out: total(Metric::WashedOutCount),
    }
}

/// Totals for every project passing `filter`, ordered by name.
#[must_use]
pub fn all_project_totals(projects: &[Project], filter: &ProjectFilter) -> Vec<ProjectTotals> {
    let mut totals: Vec<ProjectTotals> = projects
        .iter()
        .filter(|p| filter.matches(&p.jk_name))
        .map(project_totals)
        .collect();
    totals.sort_by(|a, b| compare_names(&a.project, &b.project));
    totals
}
