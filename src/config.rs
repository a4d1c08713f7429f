use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::page::DEFAULT_PAGE_SIZE;
use crate::scenario::loader::DEFAULT_SCENARIO_DIR;
use crate::scenario::model::Scenario;

/// Overrides `data_dir` when set.
pub const DATA_DIR_ENV: &str = "EPI_DASHBOARD_DATA_DIR";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Where the static data lives and how the pages behave. Every field has a
/// default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Root of the published static files.
    pub data_dir: PathBuf,
    /// Explorer dataset, relative to `data_dir`.
    pub dataset_file: String,
    /// Scenario files directory, relative to `data_dir`.
    pub scenario_dir: String,
    pub page_size: usize,
    pub default_scenario: Scenario,
    pub prediction_latency_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("public"),
            dataset_file: "donnees_fake.json".to_string(),
            scenario_dir: DEFAULT_SCENARIO_DIR.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            default_scenario: Scenario::default(),
            prediction_latency_ms: 1500,
        }
    }
}

impl DashboardConfig {
    /// Read `path` if given (defaults otherwise), then apply the environment
    /// override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        anyhow::ensure!(config.page_size > 0, "page_size must be greater than zero");
        Ok(config)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(&self.dataset_file)
    }

    pub fn scenario_path(&self) -> PathBuf {
        self.data_dir.join(&self.scenario_dir)
    }

    pub fn prediction_latency(&self) -> Duration {
        Duration::from_millis(self.prediction_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = DashboardConfig::from_json(
            r#"{"data_dir": "/srv/www", "page_size": 10, "default_scenario": "relachement"}"#,
        )
        .unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_scenario, Scenario::Relaxation);
        assert_eq!(config.dataset_file, "donnees_fake.json");
        assert_eq!(
            config.scenario_path(),
            PathBuf::from("/srv/www/results-model-2025")
        );
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(DashboardConfig::from_json(r#"{"page_size": 0}"#).is_err());
    }

    #[test]
    fn unknown_scenario_is_rejected() {
        assert!(DashboardConfig::from_json(r#"{"default_scenario": "lockdown"}"#).is_err());
    }

    #[test]
    fn defaults_point_at_public_dir() {
        let config = DashboardConfig::default();
        assert_eq!(config.dataset_path(), PathBuf::from("public/donnees_fake.json"));
        assert_eq!(config.prediction_latency(), Duration::from_millis(1500));
    }
}
