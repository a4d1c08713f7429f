use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use epi_dashboard::config::DashboardConfig;
use epi_dashboard::data::filter::FilterCriteria;
use epi_dashboard::predict::MockPredictionService;
use epi_dashboard::scenario::loader::FileScenarioLoader;
use epi_dashboard::scenario::model::{Scenario, Trend};
use epi_dashboard::state::{DatasetExplorer, LoadOutcome, PredictionPanel, ScenarioDashboard};

#[derive(Parser)]
#[command(name = "epi-dashboard")]
#[command(about = "Explore epidemiological records and 2025 prediction scenarios", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Root of the static data files (overrides config and environment)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, page through and export the record dataset
    Explore {
        #[arg(long, default_value = "")]
        pays: String,
        #[arg(long, default_value = "")]
        maladie: String,
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Write the filtered records as CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Show month boundary predictions and the trend breakdown of a scenario
    Dashboard {
        #[arg(long)]
        scenario: Option<Scenario>,
    },
    /// Ask the (mocked) prediction service for a risk estimate
    Predict {
        #[arg(long)]
        population: String,
        #[arg(long, default_value = "")]
        density: String,
        #[arg(long, default_value = "")]
        temperature: String,
        #[arg(long, default_value = "")]
        humidity: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Explore {
            pays,
            maladie,
            date,
            page,
            export,
        } => {
            let mut explorer = DatasetExplorer::new(config.page_size);
            explorer.load_file(&config.dataset_path())?;
            explorer.set_criteria(
                FilterCriteria::explorer_default()
                    .with("pays", pays)
                    .with("maladie", maladie)
                    .with("date", date),
            );
            explorer
                .go_to_page(page)
                .with_context(|| format!("cannot show page {page}"))?;

            let current = explorer.current_page();
            if current.visible.is_empty() {
                println!("No data to display.");
            } else {
                let headers = explorer.headers();
                println!(
                    "{}",
                    headers
                        .iter()
                        .map(|h| h.to_uppercase())
                        .collect::<Vec<_>>()
                        .join(" | ")
                );
                for record in current.visible {
                    let cells: Vec<String> = headers
                        .iter()
                        .map(|h| record.get(h).map(|v| v.to_string()).unwrap_or_default())
                        .collect();
                    println!("{}", cells.join(" | "));
                }
            }
            println!("Page {} / {}", current.page_index, current.total_pages);

            if let Some(path) = export {
                explorer.export_to(&path)?;
                println!(
                    "Exported {} records to {}.",
                    explorer.filtered().len(),
                    path.display()
                );
            }
        }
        Commands::Dashboard { scenario } => {
            let scenario = scenario.unwrap_or(config.default_scenario);
            let loader = FileScenarioLoader::new(config.scenario_path());
            let mut dashboard = ScenarioDashboard::new(scenario);

            match dashboard.reload(&loader, scenario).await {
                LoadOutcome::Applied => {}
                LoadOutcome::Failed(e) => bail!(e),
                LoadOutcome::Stale => bail!("load for {scenario} was superseded"),
            }

            println!("Scenario: {}", scenario.label());
            println!("New cases, start & end of month:");
            for point in dashboard.chart_points() {
                println!(
                    "- {} {:>10.2} cases  trend {} ({})",
                    point.date, point.new_cases, point.trend, point.ordinal
                );
            }

            let summary = dashboard.summary();
            println!("Trend breakdown over {} days:", summary.total());
            for trend in Trend::ALL {
                println!(
                    "- {}: {} ({:.1}%)",
                    trend,
                    summary.get(trend),
                    summary.share(trend) * 100.0
                );
            }
        }
        Commands::Predict {
            population,
            density,
            temperature,
            humidity,
        } => {
            let mut panel = PredictionPanel::default();
            panel.form.set("population", &population);
            panel.form.set("density", &density);
            panel.form.set("temperature", &temperature);
            panel.form.set("humidity", &humidity);

            let service = MockPredictionService::with_latency(config.prediction_latency());
            panel.submit(&service).await;

            match (&panel.result, &panel.error) {
                (Some(prediction), _) => println!(
                    "Risk: {} (probability {}%)",
                    prediction.risk, prediction.probability
                ),
                (None, Some(message)) => bail!("{message}"),
                (None, None) => bail!("no prediction returned"),
            }
        }
    }

    Ok(())
}
