//! Client side of the risk prediction service.
//!
//! The model behind it is opaque: a request goes in, a risk label and a
//! probability come out, or the call fails.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub population: f64,
    /// Inhabitants per km².
    pub density: f64,
    /// Mean temperature, °C.
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub risk: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error("prediction service unavailable: {0}")]
    Unavailable(String),
    #[error("prediction service returned an invalid response: {0}")]
    InvalidResponse(String),
}

pub trait PredictionService {
    fn predict(
        &self,
        request: &PredictionRequest,
    ) -> impl Future<Output = Result<Prediction, PredictionError>> + Send;
}

// ---------------------------------------------------------------------------
// Mock service
// ---------------------------------------------------------------------------

/// Answers every request with a fixed high-risk estimate after `latency`.
#[derive(Debug, Clone)]
pub struct MockPredictionService {
    pub latency: Duration,
    /// When set, every call fails with this reason.
    pub failure: Option<String>,
}

impl Default for MockPredictionService {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1500),
            failure: None,
        }
    }
}

impl MockPredictionService {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            failure: None,
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            latency: Duration::ZERO,
            failure: Some(reason.into()),
        }
    }
}

impl PredictionService for MockPredictionService {
    async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, PredictionError> {
        log::debug!("Mock prediction for {request:?}");
        tokio::time::sleep(self.latency).await;
        match &self.failure {
            Some(reason) => Err(PredictionError::Unavailable(reason.clone())),
            None => Ok(Prediction {
                risk: "Élevé".to_string(),
                probability: 87.0,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PredictionRequest {
        PredictionRequest {
            population: 67_000_000.0,
            density: 105.0,
            temperature: 12.5,
            humidity: 70.0,
        }
    }

    #[tokio::test]
    async fn mock_returns_fixed_estimate() {
        let service = MockPredictionService::with_latency(Duration::from_millis(1));
        let prediction = service.predict(&request()).await.unwrap();
        assert_eq!(prediction.risk, "Élevé");
        assert_eq!(prediction.probability, 87.0);
    }

    #[tokio::test]
    async fn failing_mock_reports_unavailable() {
        let service = MockPredictionService::failing("timeout");
        let err = service.predict(&request()).await.unwrap_err();
        assert_eq!(err, PredictionError::Unavailable("timeout".to_string()));
    }
}
