//! Scenario layer: pre-computed yearly predictions per containment scenario.
//!
//! ```text
//!  predictions_<scenario>.json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  async fetch → Vec<TrendSample>
//!   └──────────┘
//!        │
//!        ├──────────────────────────┐
//!        ▼                          ▼
//!   ┌────────────────────┐   ┌──────────────────┐
//!   │ select_boundary_days│   │ summarize_trends  │
//!   │ (line / bar charts) │   │ (whole period)    │
//!   └────────────────────┘   └──────────────────┘
//! ```

pub mod aggregate;
pub mod loader;
pub mod model;
