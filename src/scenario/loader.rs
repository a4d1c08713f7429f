use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Scenario, TrendSample};

/// Directory the scenario files are published under.
pub const DEFAULT_SCENARIO_DIR: &str = "results-model-2025";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("scenario '{scenario}' is unavailable: {reason}")]
    Unavailable { scenario: Scenario, reason: String },
    #[error("scenario '{scenario}' payload is malformed: {reason}")]
    Malformed { scenario: Scenario, reason: String },
}

/// Source of pre-computed scenario samples.
pub trait ScenarioLoader {
    fn load(
        &self,
        scenario: Scenario,
    ) -> impl Future<Output = Result<Vec<TrendSample>, LoadError>> + Send;
}

/// Decode a scenario file body: a JSON array of samples.
///
/// A body that is not a JSON array fails the whole load. An entry that does not
/// decode (missing field, unknown trend label) is skipped with a warning.
pub fn parse_samples(scenario: Scenario, text: &str) -> Result<Vec<TrendSample>, LoadError> {
    let root: JsonValue = serde_json::from_str(text).map_err(|e| LoadError::Malformed {
        scenario,
        reason: e.to_string(),
    })?;

    let JsonValue::Array(entries) = root else {
        return Err(LoadError::Malformed {
            scenario,
            reason: "expected top-level JSON array".to_string(),
        });
    };

    let mut samples = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<TrendSample>(entry) {
            Ok(sample) => samples.push(sample),
            Err(e) => log::warn!("{scenario}: skipping entry {i}: {e}"),
        }
    }
    Ok(samples)
}

// ---------------------------------------------------------------------------
// File-backed loader
// ---------------------------------------------------------------------------

/// Reads `<dir>/predictions_<scenario>.json`.
#[derive(Debug, Clone)]
pub struct FileScenarioLoader {
    pub dir: PathBuf,
}

impl FileScenarioLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, scenario: Scenario) -> PathBuf {
        self.dir.join(scenario.file_name())
    }
}

impl ScenarioLoader for FileScenarioLoader {
    async fn load(&self, scenario: Scenario) -> Result<Vec<TrendSample>, LoadError> {
        let path = self.path_for(scenario);
        log::debug!("Loading scenario {scenario} from {}", path.display());

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LoadError::Unavailable {
                scenario,
                reason: format!("{}: {e}", path.display()),
            })?;

        let samples = parse_samples(scenario, &text)?;
        log::info!("Loaded {} samples for scenario {scenario}", samples.len());
        Ok(samples)
    }
}

// ---------------------------------------------------------------------------
// In-memory loader
// ---------------------------------------------------------------------------

/// Serves fixed collections, optionally after a per-scenario delay.
#[derive(Debug, Clone, Default)]
pub struct StaticScenarioLoader {
    samples: HashMap<Scenario, Vec<TrendSample>>,
    delays: HashMap<Scenario, Duration>,
}

impl StaticScenarioLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(mut self, scenario: Scenario, samples: Vec<TrendSample>) -> Self {
        self.samples.insert(scenario, samples);
        self
    }

    pub fn with_delay(mut self, scenario: Scenario, delay: Duration) -> Self {
        self.delays.insert(scenario, delay);
        self
    }
}

impl ScenarioLoader for StaticScenarioLoader {
    async fn load(&self, scenario: Scenario) -> Result<Vec<TrendSample>, LoadError> {
        if let Some(delay) = self.delays.get(&scenario) {
            tokio::time::sleep(*delay).await;
        }
        self.samples
            .get(&scenario)
            .cloned()
            .ok_or_else(|| LoadError::Unavailable {
                scenario,
                reason: "no samples registered".to_string(),
            })
    }
}
