//! Dashboard configuration.
//!
//! Resolution order, later wins: the built-in defaults (embedded from
//! `config/default.toml`), an optional TOML file, then the
//! `REALTY_DASH_DATA_PATH` / `REALTY_DASH_DATA_URL` environment
//! variables. Command-line flags are applied on top by the caller.

use std::path::{Path, PathBuf};

use realty_dash_market_models::DEFAULT_DOWN_PAYMENT_PERCENT;
use serde::{Deserialize, Serialize};

use crate::{DataSource, LoadError};

/// Built-in configuration, baked into the binary.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Overrides the snapshot file path.
pub const DATA_PATH_ENV: &str = "REALTY_DASH_DATA_PATH";
/// Overrides the snapshot URL.
pub const DATA_URL_ENV: &str = "REALTY_DASH_DATA_URL";

/// Errors that can occur while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config is not valid TOML of the expected shape.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// `[data]`: where the snapshot comes from. A URL takes precedence over a
/// path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
}

/// `[mortgage]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageSettings {
    /// Down payment share (%) for projects without their own config.
    pub default_down_payment_percent: f64,
}

impl Default for MortgageSettings {
    fn default() -> Self {
        Self {
            default_down_payment_percent: DEFAULT_DOWN_PAYMENT_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub mortgage: MortgageSettings,
}

impl DashboardConfig {
    /// Parses a config from TOML text. Missing sections and keys keep
    /// their defaults.
    ///
    /// # Errors
    ///
    /// * If `toml` is not valid TOML of the expected shape
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml)?)
    }

    /// The built-in configuration.
    ///
    /// # Errors
    ///
    /// * If the embedded config is malformed
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Reads the config at `path`, or the built-in one when `path` is
    /// `None`, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read
    /// * If the config cannot be parsed
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                log::debug!("Reading config from {}", path.display());
                Self::from_toml(&std::fs::read_to_string(path)?)?
            }
            None => Self::builtin()?,
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies `REALTY_DASH_DATA_PATH` and `REALTY_DASH_DATA_URL` as read
    /// through `lookup`. Empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = var(DATA_PATH_ENV) {
            log::debug!("{DATA_PATH_ENV}={path}");
            self.data.path = Some(PathBuf::from(path));
            self.data.url = None;
        }
        if let Some(url) = var(DATA_URL_ENV) {
            log::debug!("{DATA_URL_ENV}={url}");
            self.data.url = Some(url);
        }
        self
    }

    /// The snapshot source to load from.
    ///
    /// # Errors
    ///
    /// * If neither a URL nor a path is configured
    pub fn source(&self) -> Result<DataSource, LoadError> {
        match (&self.data.url, &self.data.path) {
            (Some(url), _) => Ok(DataSource::Url(url.clone())),
            (None, Some(path)) => Ok(DataSource::Path(path.clone())),
            (None, None) => Err(LoadError::NoSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_parses() {
        let config = DashboardConfig::builtin().unwrap();
        assert_eq!(
            config.source().unwrap(),
            DataSource::Path(PathBuf::from("data.json"))
        );
        assert!((config.mortgage.default_down_payment_percent - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = DashboardConfig::from_toml("[data]\nurl = \"https://example.com/data.json\"\n")
            .unwrap();
        assert_eq!(
            config.source().unwrap(),
            DataSource::Url("https://example.com/data.json".to_string())
        );
        assert_eq!(config.mortgage, MortgageSettings::default());
    }

    #[test]
    fn malformed_config_is_rejected() {
        assert!(matches!(
            DashboardConfig::from_toml("[mortgage]\ndefault_down_payment_percent = \"a lot\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn environment_overrides_file() {
        let config = DashboardConfig::builtin().unwrap().with_overrides(|key| {
            (key == DATA_PATH_ENV).then(|| "/srv/snapshot.json".to_string())
        });
        assert_eq!(
            config.source().unwrap(),
            DataSource::Path(PathBuf::from("/srv/snapshot.json"))
        );

        let config = config.with_overrides(|key| match key {
            DATA_URL_ENV => Some("https://example.com/s.json".to_string()),
            _ => Some("  ".to_string()),
        });
        assert_eq!(
            config.source().unwrap(),
            DataSource::Url("https://example.com/s.json".to_string())
        );
    }

    #[test]
    fn no_source_is_an_error() {
        let config = DashboardConfig::default();
        assert!(matches!(config.source(), Err(LoadError::NoSource)));
    }
}
