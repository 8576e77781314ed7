//! Holds the loaded snapshot and ignores results of superseded loads.

use std::sync::Arc;

use realty_dash_market_models::RootData;

use crate::LoadError;

/// Where a load stands.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// A load is in flight and nothing has been loaded yet.
    Loading,
    /// The snapshot, shared read-only with every view.
    Ready(Arc<RootData>),
    /// The last load failed.
    Failed(String),
}

/// Issued by [`SnapshotStore::begin_load`]; only the ticket of the most
/// recent load can complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct SnapshotStore {
    generation: u64,
    state: LoadState,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self {
            generation: 0,
            state: LoadState::Loading,
        }
    }
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load. Tickets of earlier loads become stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Records the result of the load identified by `ticket`.
    ///
    /// Returns `false` and leaves the store untouched when a newer load
    /// has begun since the ticket was issued.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<RootData, LoadError>) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "ignoring stale snapshot load {} (current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(data) => {
                log::info!("Snapshot ready: {} projects", data.projects.len());
                LoadState::Ready(Arc::new(data))
            }
            Err(e) => {
                log::error!("Snapshot load failed: {e}");
                LoadState::Failed(e.to_string())
            }
        };
        true
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// The loaded snapshot, if ready.
    #[must_use]
    pub fn data(&self) -> Option<Arc<RootData>> {
        match &self.state {
            LoadState::Ready(data) => Some(Arc::clone(data)),
            _ => None,
        }
    }

    /// The failure message of the last load, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realty_dash_market_models::Project;

    fn snapshot(name: &str) -> RootData {
        RootData {
            projects: vec![Project {
                jk_name: name.to_string(),
                ..Project::default()
            }],
            last_updated: None,
        }
    }

    #[test]
    fn starts_loading() {
        let store = SnapshotStore::new();
        assert!(store.is_loading());
        assert!(store.data().is_none());
    }

    #[test]
    fn completes_current_load() {
        let mut store = SnapshotStore::new();
        let ticket = store.begin_load();
        assert!(store.complete(ticket, Ok(snapshot("Alpha"))));
        assert_eq!(store.data().unwrap().project_names(), ["Alpha"]);
    }

    #[test]
    fn stale_result_is_ignored() {
        let mut store = SnapshotStore::new();
        let first = store.begin_load();
        let second = store.begin_load();

        assert!(store.complete(second, Ok(snapshot("New"))));
        assert!(!store.complete(first, Ok(snapshot("Old"))));
        assert_eq!(store.data().unwrap().project_names(), ["New"]);

        assert!(!store.complete(first, Err(LoadError::NoSource)));
        assert!(store.error().is_none());
    }

    #[test]
    fn failure_is_recorded() {
        let mut store = SnapshotStore::new();
        let ticket = store.begin_load();
        assert!(store.complete(ticket, Err(LoadError::Status(404))));
        assert_eq!(store.error(), Some("HTTP 404"));
        assert!(!store.is_loading());
    }
}
