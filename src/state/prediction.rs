use thiserror::Error;

use crate::predict::{Prediction, PredictionRequest, PredictionService};

/// The one message users see for any prediction failure.
pub const PREDICTION_ERROR_MESSAGE: &str = "An error occurred while computing the prediction.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("population is required")]
    MissingPopulation,
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// Form inputs
// ---------------------------------------------------------------------------

/// Raw text of the prediction form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionForm {
    pub population: String,
    pub density: String,
    pub temperature: String,
    pub humidity: String,
}

impl PredictionForm {
    /// Update one input by name; unknown names are ignored.
    pub fn set(&mut self, name: &str, value: &str) {
        let slot = match name {
            "population" => &mut self.population,
            "density" => &mut self.density,
            "temperature" => &mut self.temperature,
            "humidity" => &mut self.humidity,
            _ => return,
        };
        *slot = value.to_string();
    }

    /// Population is required; the other inputs default to 0 when blank.
    pub fn to_request(&self) -> Result<PredictionRequest, FormError> {
        if self.population.trim().is_empty() {
            return Err(FormError::MissingPopulation);
        }
        Ok(PredictionRequest {
            population: parse_number("population", &self.population)?,
            density: parse_number("density", &self.density)?,
            temperature: parse_number("temperature", &self.temperature)?,
            humidity: parse_number("humidity", &self.humidity)?,
        })
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>().map_err(|_| FormError::NotANumber {
        field,
        value: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Prediction panel state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PredictionPanel {
    pub form: PredictionForm,
    pub loading: bool,
    pub result: Option<Prediction>,
    /// User-facing error, empty when the last call succeeded.
    pub error: Option<String>,
}

impl PredictionPanel {
    /// Submit the form. Previous result and error are cleared first; any
    /// failure ends with [`PREDICTION_ERROR_MESSAGE`].
    pub async fn submit<S: PredictionService>(&mut self, service: &S) {
        self.loading = true;
        self.error = None;
        self.result = None;

        let outcome = match self.form.to_request() {
            Ok(request) => service.predict(&request).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(prediction) => {
                log::info!(
                    "Prediction: risk {} ({}%)",
                    prediction.risk,
                    prediction.probability
                );
                self.result = Some(prediction);
            }
            Err(reason) => {
                log::warn!("Prediction failed: {reason}");
                self.error = Some(PREDICTION_ERROR_MESSAGE.to_string());
            }
        }
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::predict::MockPredictionService;

    fn filled() -> PredictionForm {
        let mut form = PredictionForm::default();
        form.set("population", "67000000");
        form.set("density", "105");
        form.set("temperature", "12.5");
        form.set("humidity", "70");
        form
    }

    #[test]
    fn blank_optional_inputs_default_to_zero() {
        let mut form = PredictionForm::default();
        form.set("population", "1000");
        let request = form.to_request().unwrap();
        assert_eq!(request.population, 1000.0);
        assert_eq!(request.humidity, 0.0);
    }

    #[test]
    fn invalid_inputs_are_reported() {
        assert_eq!(PredictionForm::default().to_request(), Err(FormError::MissingPopulation));
        let mut form = filled();
        form.set("humidity", "humid");
        assert!(matches!(
            form.to_request(),
            Err(FormError::NotANumber { field: "humidity", .. })
        ));
    }

    #[tokio::test]
    async fn successful_submit_stores_result() {
        let mut panel = PredictionPanel {
            form: filled(),
            ..Default::default()
        };
        panel
            .submit(&MockPredictionService::with_latency(Duration::from_millis(1)))
            .await;
        assert!(!panel.loading);
        assert_eq!(panel.result.as_ref().map(|p| p.probability), Some(87.0));
        assert!(panel.error.is_none());
    }

    #[tokio::test]
    async fn service_failure_shows_single_message_and_clears_result() {
        let mut panel = PredictionPanel {
            form: filled(),
            ..Default::default()
        };
        panel
            .submit(&MockPredictionService::with_latency(Duration::ZERO))
            .await;
        assert!(panel.result.is_some());

        panel.submit(&MockPredictionService::failing("503")).await;
        assert!(panel.result.is_none());
        assert_eq!(panel.error.as_deref(), Some(PREDICTION_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_service() {
        let mut panel = PredictionPanel::default();
        panel.submit(&MockPredictionService::default()).await;
        assert_eq!(panel.error.as_deref(), Some(PREDICTION_ERROR_MESSAGE));
    }
}
