//! Project grouping for grouped tables.

use std::collections::BTreeSet;

use realty_dash_analytics_models::{ComparedRow, ForecastRow, PromotionRow, Row};
use serde::{Deserialize, Serialize};

/// Anything that belongs to a project.
pub trait ProjectRow {
    fn project(&self) -> &str;
}

impl ProjectRow for Row {
    fn project(&self) -> &str {
        &self.project
    }
}

impl ProjectRow for ComparedRow {
    fn project(&self) -> &str {
        &self.row.project
    }
}

impl ProjectRow for ForecastRow {
    fn project(&self) -> &str {
        &self.project
    }
}

impl ProjectRow for PromotionRow {
    fn project(&self) -> &str {
        &self.project
    }
}

/// Rows of one project, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGroup<T> {
    pub project: String,
    pub rows: Vec<T>,
}

/// Groups `rows` by project. Groups appear in order of each project's
/// first row and keep the order of their rows.
#[must_use]
pub fn group_by_project<T: ProjectRow>(rows: Vec<T>) -> Vec<ProjectGroup<T>> {
    let mut groups: Vec<ProjectGroup<T>> = Vec::new();

    for row in rows {
        if let Some(group) = groups.iter_mut().find(|g| g.project == row.project()) {
            group.rows.push(row);
        } else {
            groups.push(ProjectGroup {
                project: row.project().to_string(),
                rows: vec![row],
            });
        }
    }

    groups
}

/// Which project groups are shown expanded. Everything starts collapsed.
/// Purely presentational; no computation reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedGroups {
    expanded: BTreeSet<String>,
}

impl ExpandedGroups {
    /// Flips `project` between expanded and collapsed.
    pub fn toggle(&mut self, project: &str) {
        if !self.expanded.remove(project) {
            self.expanded.insert(project.to_string());
        }
    }

    #[must_use]
    pub fn is_expanded(&self, project: &str) -> bool {
        self.expanded.contains(project)
    }

    /// Expands every listed project.
    pub fn expand_all<I, S>(&mut self, projects: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expanded.extend(projects.into_iter().map(Into::into));
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}
