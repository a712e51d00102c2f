use anyhow::{Context, Result};
use shower_emissions::config::{Config, DEFAULT_CONFIG_PATH};
use shower_emissions::domain::{Metric, ResultSet, SourceKind};
use shower_emissions::simulation::{LoggingProgress, MonteCarloEngine};
use shower_emissions::telemetry::init_tracing;
use strum::IntoEnumIterator;
use tracing::info;

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&path)?;

    init_tracing(cfg.logging.json);

    let catalogs = cfg.catalogs()?;
    let sim_config = cfg.simulation_config()?;
    info!(
        trials = sim_config.trials,
        seed = ?sim_config.seed,
        mu = sim_config.duration.mu,
        sigma = sim_config.duration.sigma,
        "running shower CO2 simulation"
    );

    let engine = MonteCarloEngine::new(catalogs);
    let results = engine.run_with_progress(&sim_config, &mut LoggingProgress::default())?;

    if cfg.output.summary {
        print_summary(&results);
    }

    if let Some(out) = &cfg.output.json_path {
        let json = results.to_json()?;
        std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
        info!(path = %out.display(), records = results.len(), "result set exported");
    }

    Ok(())
}

fn print_summary(results: &ResultSet) {
    println!(
        "{:<22} {:>5} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "metric", "unit", "mean", "std", "min", "p5", "p50", "p95", "max"
    );
    for metric in Metric::iter() {
        if let Some(s) = results.summary(metric) {
            println!(
                "{:<22} {:>5} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                metric.to_string(),
                metric.unit(),
                s.mean,
                s.std_dev,
                s.min,
                s.p5,
                s.p50,
                s.p95,
                s.max
            );
        }
    }

    for kind in SourceKind::iter() {
        println!("\n{kind} sources:");
        let counts = results.source_counts(kind);
        for name in results.distinct_sources(kind) {
            let count = counts.get(name).copied().unwrap_or(0);
            let share = count as f64 / results.len() as f64 * 100.0;
            println!("  {count:>6} ({share:>5.1}%)  {name}");
        }
    }
}
