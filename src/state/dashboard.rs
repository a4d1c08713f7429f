use crate::scenario::aggregate::{
    ChartPoint, TrendSummary, chart_points, select_boundary_days, summarize_trends,
};
use crate::scenario::loader::{LoadError, ScenarioLoader};
use crate::scenario::model::{Scenario, TrendSample};

// ---------------------------------------------------------------------------
// Load tickets
// ---------------------------------------------------------------------------

/// Issued when a load starts; presented back with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub scenario: Scenario,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Result installed.
    Applied,
    /// A newer selection superseded this load; result dropped.
    Stale,
    /// The load failed; previous charts are kept.
    Failed(LoadError),
}

// ---------------------------------------------------------------------------
// Scenario dashboard state
// ---------------------------------------------------------------------------

/// State behind the scenario dashboard. All derived views are replaced
/// together or not at all.
#[derive(Debug, Clone, Default)]
pub struct ScenarioDashboard {
    selected: Scenario,
    generation: u64,

    /// Scenario the current samples belong to (None before the first load).
    loaded: Option<Scenario>,
    samples: Vec<TrendSample>,
    boundary_samples: Vec<TrendSample>,
    summary: TrendSummary,

    /// Whether a load for `selected` is in flight.
    pub loading: bool,
    /// User-visible message from the last failed load.
    pub error: Option<String>,
}

impl ScenarioDashboard {
    pub fn new(initial: Scenario) -> Self {
        Self {
            selected: initial,
            ..Self::default()
        }
    }

    pub fn selected(&self) -> Scenario {
        self.selected
    }

    pub fn loaded_scenario(&self) -> Option<Scenario> {
        self.loaded
    }

    pub fn samples(&self) -> &[TrendSample] {
        &self.samples
    }

    /// Month-start and month-end samples for the time-series charts.
    pub fn boundary_samples(&self) -> &[TrendSample] {
        &self.boundary_samples
    }

    pub fn chart_points(&self) -> Vec<ChartPoint> {
        chart_points(&self.boundary_samples)
    }

    /// Trend counts over the whole loaded period.
    pub fn summary(&self) -> &TrendSummary {
        &self.summary
    }

    /// Select a scenario and start a load for it. Any ticket issued earlier
    /// becomes stale. Charts of the previous scenario stay visible meanwhile.
    pub fn select(&mut self, scenario: Scenario) -> LoadTicket {
        self.selected = scenario;
        self.generation += 1;
        self.loading = true;
        log::debug!("Selected scenario {scenario} (generation {})", self.generation);
        LoadTicket {
            scenario,
            generation: self.generation,
        }
    }

    /// Install the result of the load identified by `ticket`.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<TrendSample>, LoadError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation || ticket.scenario != self.selected {
            log::info!(
                "Dropping stale response for {} (now showing {})",
                ticket.scenario,
                self.selected
            );
            return LoadOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(samples) => {
                let boundary_samples = select_boundary_days(&samples);
                let summary = summarize_trends(&samples);
                self.boundary_samples = boundary_samples;
                self.summary = summary;
                self.samples = samples;
                self.loaded = Some(ticket.scenario);
                self.error = None;
                LoadOutcome::Applied
            }
            Err(e) => {
                log::error!("{e}");
                self.error = Some(format!("Could not load scenario '{}': {e}", ticket.scenario.label()));
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Select `scenario`, load it and apply the result.
    pub async fn reload<L: ScenarioLoader>(&mut self, loader: &L, scenario: Scenario) -> LoadOutcome {
        let ticket = self.select(scenario);
        let result = loader.load(scenario).await;
        self.apply(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::scenario::loader::StaticScenarioLoader;
    use crate::scenario::model::Trend;

    fn year_start(trend: Trend, cases: f64) -> Vec<TrendSample> {
        (1..=31)
            .map(|day| TrendSample::new(format!("2025-01-{day:02}"), cases, trend))
            .collect()
    }

    #[test]
    fn successful_load_derives_all_views() {
        let mut dashboard = ScenarioDashboard::new(Scenario::StrongMeasures);
        let ticket = dashboard.select(Scenario::StrongMeasures);
        let outcome = dashboard.apply(ticket, Ok(year_start(Trend::Falling, 900.0)));

        assert_eq!(outcome, LoadOutcome::Applied);
        assert!(!dashboard.loading);
        assert_eq!(dashboard.samples().len(), 31);
        assert_eq!(dashboard.boundary_samples().len(), 5);
        assert_eq!(dashboard.summary().get(Trend::Falling), 31);
        assert_eq!(dashboard.chart_points()[0].ordinal, 1);
        assert_eq!(dashboard.loaded_scenario(), Some(Scenario::StrongMeasures));
    }

    #[test]
    fn late_response_for_superseded_scenario_is_dropped() {
        let mut dashboard = ScenarioDashboard::default();
        let ticket_a = dashboard.select(Scenario::StrongMeasures);
        let ticket_b = dashboard.select(Scenario::Relaxation);

        assert_eq!(
            dashboard.apply(ticket_b, Ok(year_start(Trend::Rising, 2500.0))),
            LoadOutcome::Applied
        );
        assert_eq!(
            dashboard.apply(ticket_a, Ok(year_start(Trend::Falling, 900.0))),
            LoadOutcome::Stale
        );

        assert_eq!(dashboard.loaded_scenario(), Some(Scenario::Relaxation));
        assert_eq!(dashboard.summary().get(Trend::Rising), 31);
        assert_eq!(dashboard.summary().get(Trend::Falling), 0);
    }

    #[test]
    fn stale_response_arriving_first_is_dropped_too() {
        let mut dashboard = ScenarioDashboard::default();
        let ticket_a = dashboard.select(Scenario::StrongMeasures);
        let ticket_b = dashboard.select(Scenario::MediumMeasures);

        assert_eq!(
            dashboard.apply(ticket_a, Ok(year_start(Trend::Falling, 900.0))),
            LoadOutcome::Stale
        );
        assert!(dashboard.loading);
        assert!(dashboard.samples().is_empty());

        dashboard.apply(ticket_b, Ok(year_start(Trend::Stable, 1500.0)));
        assert_eq!(dashboard.loaded_scenario(), Some(Scenario::MediumMeasures));
    }

    #[test]
    fn reselecting_the_same_scenario_supersedes_the_older_ticket() {
        let mut dashboard = ScenarioDashboard::default();
        let first = dashboard.select(Scenario::StrongMeasures);
        dashboard.select(Scenario::Relaxation);
        let third = dashboard.select(Scenario::StrongMeasures);

        assert_eq!(dashboard.apply(first, Ok(Vec::new())), LoadOutcome::Stale);
        assert_eq!(
            dashboard.apply(third, Ok(year_start(Trend::Stable, 1.0))),
            LoadOutcome::Applied
        );
    }

    #[test]
    fn failed_load_keeps_previous_charts() {
        let mut dashboard = ScenarioDashboard::default();
        let ticket = dashboard.select(Scenario::StrongMeasures);
        dashboard.apply(ticket, Ok(year_start(Trend::Stable, 1200.0)));

        let ticket = dashboard.select(Scenario::Relaxation);
        let error = LoadError::Unavailable {
            scenario: Scenario::Relaxation,
            reason: "connection refused".to_string(),
        };
        let outcome = dashboard.apply(ticket, Err(error.clone()));

        assert_eq!(outcome, LoadOutcome::Failed(error));
        assert!(!dashboard.loading);
        assert!(dashboard.error.is_some());
        assert_eq!(dashboard.loaded_scenario(), Some(Scenario::StrongMeasures));
        assert_eq!(dashboard.summary().get(Trend::Stable), 31);

        // A later success clears the message.
        let ticket = dashboard.select(Scenario::StrongMeasures);
        dashboard.apply(ticket, Ok(year_start(Trend::Rising, 1.0)));
        assert!(dashboard.error.is_none());
    }

    #[tokio::test]
    async fn reload_goes_through_the_loader() {
        let loader = StaticScenarioLoader::new()
            .with_samples(Scenario::MediumMeasures, year_start(Trend::Rising, 1800.0));
        let mut dashboard = ScenarioDashboard::default();

        let outcome = dashboard.reload(&loader, Scenario::MediumMeasures).await;
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(dashboard.boundary_samples().len(), 5);

        let outcome = dashboard.reload(&loader, Scenario::Relaxation).await;
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(dashboard.loaded_scenario(), Some(Scenario::MediumMeasures));
    }

    #[tokio::test]
    async fn concurrent_loads_resolve_last_selection_wins() {
        let loader = StaticScenarioLoader::new()
            .with_samples(Scenario::StrongMeasures, year_start(Trend::Falling, 900.0))
            .with_delay(Scenario::StrongMeasures, Duration::from_millis(80))
            .with_samples(Scenario::Relaxation, year_start(Trend::Rising, 2500.0))
            .with_delay(Scenario::Relaxation, Duration::from_millis(5));

        let mut dashboard = ScenarioDashboard::default();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        // Issue A, then B before A resolves; B answers first.
        for scenario in [Scenario::StrongMeasures, Scenario::Relaxation] {
            let ticket = dashboard.select(scenario);
            let loader = loader.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = loader.load(scenario).await;
                let _ = tx.send((ticket, result));
            });
        }
        drop(tx);

        let mut outcomes = Vec::new();
        while let Some((ticket, result)) = rx.recv().await {
            outcomes.push((ticket.scenario, dashboard.apply(ticket, result)));
        }

        assert_eq!(
            outcomes,
            vec![
                (Scenario::Relaxation, LoadOutcome::Applied),
                (Scenario::StrongMeasures, LoadOutcome::Stale),
            ]
        );
        assert_eq!(dashboard.loaded_scenario(), Some(Scenario::Relaxation));
        assert_eq!(dashboard.summary().get(Trend::Falling), 0);
    }
}
