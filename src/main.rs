use mab_sim::config::AppConfig;
use mab_sim::errors::AppError;

use std::collections::BTreeMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut simulation = config.build_simulation()?;
    let stats = simulation.run(config.simulation.trials, config.simulation.steps)?;

    let mut results = BTreeMap::new();
    for &metric in &config.metrics {
        let values = stats.compute(metric);
        for (name, series) in &values {
            if let Some(last) = series.last() {
                info!(metric = %metric, strategy = %name, last = %last, "Final value");
            }
        }
        results.insert(metric.label(), values.into_iter().collect::<BTreeMap<_, _>>());
    }

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
