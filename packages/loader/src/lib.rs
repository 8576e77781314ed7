#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Snapshot loading for the dashboard.
//!
//! A snapshot is read once, from a local file or over HTTP, and parsed
//! into a [`RootData`]. Producers export either a bare array of projects
//! or an object with `projects` and `last_updated`; both normalize to the
//! same value. Downstream code only ever sees a fully parsed snapshot.

pub mod config;
pub mod store;

use std::path::{Path, PathBuf};

use realty_dash_market_models::{Project, RootData};

pub use config::{ConfigError, DashboardConfig};
pub use store::{LoadState, LoadTicket, SnapshotStore};

/// Errors that can occur while loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading the snapshot file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The snapshot is not valid JSON of the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Neither a path nor a URL was configured.
    #[error("No snapshot source configured")]
    NoSource,
}

/// Where a snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Parses a snapshot from JSON text.
///
/// # Errors
///
/// * If `json` is not valid JSON
/// * If the JSON is neither an array of projects nor a snapshot object
pub fn parse_snapshot(json: &str) -> Result<RootData, LoadError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;

    let data = if raw.is_array() {
        RootData {
            projects: serde_json::from_value::<Vec<Project>>(raw)?,
            last_updated: None,
        }
    } else {
        serde_json::from_value::<RootData>(raw)?
    };

    log::debug!("parsed snapshot with {} projects", data.projects.len());
    Ok(data)
}

/// Reads and parses a snapshot file.
///
/// # Errors
///
/// * If the file cannot be read
/// * If its contents cannot be parsed
pub async fn load_from_path(path: &Path) -> Result<RootData, LoadError> {
    log::info!("Reading snapshot from {}", path.display());
    let json = tokio::fs::read_to_string(path).await?;
    parse_snapshot(&json)
}

/// Downloads and parses a snapshot.
///
/// # Errors
///
/// * If the request fails or the server answers with a non-success status
/// * If the body cannot be parsed
pub async fn fetch_snapshot(url: &str) -> Result<RootData, LoadError> {
    log::info!("Fetching snapshot from {url}");

    let client = reqwest::Client::new();
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    parse_snapshot(&body)
}

/// Loads a snapshot from `source`.
///
/// # Errors
///
/// * If reading, fetching or parsing fails
pub async fn load(source: &DataSource) -> Result<RootData, LoadError> {
    match source {
        DataSource::Path(path) => load_from_path(path).await,
        DataSource::Url(url) => fetch_snapshot(url).await,
    }
}
