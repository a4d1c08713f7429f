//! Page-level state, independent of rendering.
//!
//! Each orchestrator owns its collection and derived views exclusively;
//! the pure functions of [`crate::data`] and [`crate::scenario`] do the work.

pub mod dashboard;
pub mod explorer;
pub mod prediction;

pub use dashboard::{LoadOutcome, LoadTicket, ScenarioDashboard};
pub use explorer::DatasetExplorer;
pub use prediction::{PredictionForm, PredictionPanel};
