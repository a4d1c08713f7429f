use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::model::{Trend, TrendSample};

// ---------------------------------------------------------------------------
// Boundary sampling
// ---------------------------------------------------------------------------

/// Day-of-month of a `YYYY-MM-DD` date, or `None` if it does not parse.
pub fn day_of_month(date: &str) -> Option<u32> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.day())
}

/// Keep only month-start (day 1) and month-end (day ≥ 28) samples, in input
/// order.
///
/// Dates must be real calendar dates in `YYYY-MM-DD` form. A sample whose date
/// does not parse is skipped, including impossible dates such as `2025-02-30`
/// whose day field alone would look like a month end.
pub fn select_boundary_days(samples: &[TrendSample]) -> Vec<TrendSample> {
    samples
        .iter()
        .filter(|sample| match day_of_month(&sample.date) {
            Some(day) => day == 1 || day >= 28,
            None => {
                log::warn!("Skipping sample with malformed date '{}'", sample.date);
                false
            }
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Chart points
// ---------------------------------------------------------------------------

/// One point for the new-cases line and the trend bar charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: String,
    pub new_cases: f64,
    pub trend: Trend,
    pub ordinal: u8,
}

pub fn chart_points(samples: &[TrendSample]) -> Vec<ChartPoint> {
    samples
        .iter()
        .map(|sample| ChartPoint {
            date: sample.date.clone(),
            new_cases: sample.new_cases,
            trend: sample.trend,
            ordinal: sample.trend.ordinal(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category counting
// ---------------------------------------------------------------------------

/// How many samples carry each trend label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendSummary {
    counts: BTreeMap<Trend, usize>,
}

impl TrendSummary {
    pub fn get(&self, trend: Trend) -> usize {
        self.counts.get(&trend).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Labels that occurred at least once, rising → stable → falling.
    pub fn iter(&self) -> impl Iterator<Item = (Trend, usize)> + '_ {
        self.counts.iter().map(|(trend, count)| (*trend, *count))
    }

    /// Fraction of all samples carrying `trend`; 0 for an empty summary.
    pub fn share(&self, trend: Trend) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(trend) as f64 / total as f64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count trend labels over the whole collection, not the boundary subset.
pub fn summarize_trends(samples: &[TrendSample]) -> TrendSummary {
    let mut counts = BTreeMap::new();
    for sample in samples {
        *counts.entry(sample.trend).or_insert(0) += 1;
    }
    TrendSummary { counts }
}
