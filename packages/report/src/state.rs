//! Dashboard selection state, passed explicitly to every view.

use realty_dash_analytics_models::{
    EngineSettings, Metric, Parameter, Period, ProjectFilter, RoomFilter, RowQuery, Unit,
};
use realty_dash_market_models::{Project, RootData};
use serde::{Deserialize, Serialize};

use crate::ReportError;
use crate::group::ExpandedGroups;

/// What the user has selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Project shown by single-project views.
    pub selected_project: Option<String>,
    /// Projects shown by multi-project views.
    pub projects: ProjectFilter,
    /// Apartment types shown by every view.
    pub rooms: RoomFilter,
    /// Period of the dynamics view.
    pub period: Period,
    /// Whether changes are shown in roubles or percent.
    pub unit: Unit,
    /// Parameter compared by the express view.
    pub parameter: Parameter,
    /// Promotion type shown by the marketing view; `None` for all.
    pub promotion_kind: Option<String>,
    /// Expanded project groups.
    pub expanded: ExpandedGroups,
    pub settings: EngineSettings,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            selected_project: None,
            projects: ProjectFilter::all(),
            rooms: RoomFilter::all(),
            period: Period::Month,
            unit: Unit::Pct,
            parameter: Parameter::SqmPrice,
            promotion_kind: None,
            expanded: ExpandedGroups::default(),
            settings: EngineSettings::default(),
        }
    }
}

impl DashboardState {
    /// Initial state for `data`: the first project is selected.
    #[must_use]
    pub fn new(data: &RootData) -> Self {
        Self {
            selected_project: data.projects.first().map(|p| p.jk_name.clone()),
            ..Self::default()
        }
    }

    /// Selects the project named `name`.
    ///
    /// # Errors
    ///
    /// * If `data` has no project named `name`
    pub fn select_project(&mut self, data: &RootData, name: &str) -> Result<(), ReportError> {
        if data.project(name).is_none() {
            return Err(ReportError::UnknownProject(name.to_string()));
        }
        self.selected_project = Some(name.to_string());
        Ok(())
    }

    /// The selected project, falling back to the first one when nothing
    /// is selected. `None` only when `data` has no projects.
    ///
    /// # Errors
    ///
    /// * If the selected project is not in `data`
    pub fn selected<'a>(&self, data: &'a RootData) -> Result<Option<&'a Project>, ReportError> {
        match self.selected_project.as_deref() {
            Some(name) => data
                .project(name)
                .map(Some)
                .ok_or_else(|| ReportError::UnknownProject(name.to_string())),
            None => Ok(data.projects.first()),
        }
    }

    /// Row query for `metrics` under the current filters.
    #[must_use]
    pub fn query(&self, metrics: impl Into<Vec<Metric>>) -> RowQuery {
        RowQuery::new(metrics)
            .with_rooms(self.rooms.clone())
            .with_projects(self.projects.clone())
            .with_settings(self.settings)
    }

    /// Row query for `metrics` restricted to `project`.
    #[must_use]
    pub fn project_query(&self, project: &Project, metrics: impl Into<Vec<Metric>>) -> RowQuery {
        self.query(metrics)
            .with_projects(ProjectFilter::only([project.jk_name.as_str()]))
    }
}
