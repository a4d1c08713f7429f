//! Data engine of the epidemiological dashboard: the record explorer
//! (filter, paginate, export) and the scenario dashboard (load, sample,
//! summarize), plus the client side of the risk prediction form.

pub mod config;
pub mod data;
pub mod predict;
pub mod scenario;
pub mod state;
