use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Scenario – which pre-computed prediction file to show
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Scenario {
    #[default]
    #[serde(rename = "fortes_mesures")]
    StrongMeasures,
    #[serde(rename = "mesures_moyennes")]
    MediumMeasures,
    #[serde(rename = "relachement")]
    Relaxation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scenario '{0}' (expected fortes_mesures, mesures_moyennes or relachement)")]
pub struct UnknownScenario(pub String);

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::StrongMeasures,
        Scenario::MediumMeasures,
        Scenario::Relaxation,
    ];

    /// Identifier used in file names and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Scenario::StrongMeasures => "fortes_mesures",
            Scenario::MediumMeasures => "mesures_moyennes",
            Scenario::Relaxation => "relachement",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Scenario::StrongMeasures => "Strong measures",
            Scenario::MediumMeasures => "Medium measures",
            Scenario::Relaxation => "Relaxation",
        }
    }

    pub fn file_name(self) -> String {
        format!("predictions_{}.json", self.id())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.id() == s)
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Trend – direction of the epidemic on a given day
// ---------------------------------------------------------------------------

/// Ordering follows the summary display: rising, stable, falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "hausse")]
    Rising,
    #[serde(rename = "stable")]
    Stable,
    #[serde(rename = "baisse")]
    Falling,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Trend::Rising, Trend::Stable, Trend::Falling];

    /// Label used by the scenario files.
    pub fn label(self) -> &'static str {
        match self {
            Trend::Rising => "hausse",
            Trend::Stable => "stable",
            Trend::Falling => "baisse",
        }
    }

    /// Position on an ordinal chart axis. Not meant for arithmetic.
    pub fn ordinal(self) -> u8 {
        match self {
            Trend::Rising => 3,
            Trend::Stable => 2,
            Trend::Falling => 1,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trend::Rising => "rising",
            Trend::Stable => "stable",
            Trend::Falling => "falling",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// TrendSample – one day of a scenario file
// ---------------------------------------------------------------------------

/// One predicted day. `date` stays textual (`YYYY-MM-DD`); it is parsed when
/// aggregating so that one bad date only drops its own sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSample {
    pub date: String,
    #[serde(rename = "prediction_nouveaux_cas")]
    pub new_cases: f64,
    #[serde(rename = "prediction_tendance")]
    pub trend: Trend,
}

impl TrendSample {
    pub fn new(date: impl Into<String>, new_cases: f64, trend: Trend) -> Self {
        TrendSample {
            date: date.into(),
            new_cases,
            trend,
        }
    }
}
