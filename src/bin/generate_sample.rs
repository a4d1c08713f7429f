use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use serde_json::json;

use epi_dashboard::scenario::loader::DEFAULT_SCENARIO_DIR;
use epi_dashboard::scenario::model::{Scenario, Trend, TrendSample};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Daily growth factor and noise per scenario.
fn scenario_params(scenario: Scenario) -> (f64, f64) {
    match scenario {
        Scenario::StrongMeasures => (0.997, 120.0),
        Scenario::MediumMeasures => (1.0005, 180.0),
        Scenario::Relaxation => (1.003, 250.0),
    }
}

/// Trend label from the change over the previous week.
fn classify(current: f64, week_ago: f64) -> Trend {
    let change = (current - week_ago) / week_ago.max(1.0);
    if change > 0.05 {
        Trend::Rising
    } else if change < -0.05 {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

fn simulate(scenario: Scenario, start: NaiveDate, rng: &mut SimpleRng) -> Vec<TrendSample> {
    let (growth, noise) = scenario_params(scenario);
    let mut base = 1500.0;
    let mut history: Vec<f64> = Vec::with_capacity(365);
    let mut samples = Vec::with_capacity(365);

    for day in 0..365 {
        base *= growth;
        let cases = rng.gauss(base, noise).max(0.0);
        let week_ago = if day >= 7 { history[day - 7] } else { base };
        history.push(cases);

        let date = start + Duration::days(day as i64);
        samples.push(TrendSample::new(
            date.format("%Y-%m-%d").to_string(),
            (cases * 100.0).round() / 100.0,
            classify(cases, week_ago),
        ));
    }
    samples
}

fn main() {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("public"));
    let scenario_dir = out_dir.join(DEFAULT_SCENARIO_DIR);
    std::fs::create_dir_all(&scenario_dir).expect("Failed to create output directory");

    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid start date");

    for scenario in Scenario::ALL {
        let samples = simulate(scenario, start, &mut rng);
        let path = scenario_dir.join(scenario.file_name());
        let text = serde_json::to_string_pretty(&samples).expect("Failed to serialize samples");
        std::fs::write(&path, text).expect("Failed to write scenario file");
        println!("Wrote {} samples to {}", samples.len(), path.display());
    }

    // Explorer dataset
    let countries = ["France", "Italie", "Espagne", "Allemagne", "Suisse", "Canada"];
    let diseases = ["Grippe", "Covid-19", "Rougeole", "Dengue"];
    let dataset_start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date");
    let rows: Vec<serde_json::Value> = (0..60)
        .map(|i| {
            let date = dataset_start + Duration::days((i * 6) as i64);
            json!({
                "pays": rng.pick(&countries),
                "maladie": rng.pick(&diseases),
                "date": date.format("%Y-%m-%d").to_string(),
                "cas": rng.gauss(800.0, 300.0).max(0.0).round() as i64,
                "deces": rng.gauss(12.0, 6.0).max(0.0).round() as i64,
            })
        })
        .collect();

    let dataset_path = out_dir.join("donnees_fake.json");
    let text = serde_json::to_string_pretty(&rows).expect("Failed to serialize dataset");
    std::fs::write(&dataset_path, text).expect("Failed to write dataset");
    println!("Wrote {} records to {}", rows.len(), dataset_path.display());
}
