//! Headless encounter runner.
//!
//! Loads an encounter from the content directory, lets the planners play
//! every side (the human-controlled unit included) and logs the outcome.
mod config;

use anyhow::{Context, Result};
use config::CliConfig;
use skirmish_content::{ConfigLoader, ContentFactory};
use skirmish_core::{EventKind, UnitId, WorldEvent};
use skirmish_runtime::{Event, Simulation, SimulationConfig, Topic, events};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();
    let config = CliConfig::from_env();
    tracing::info!(?config, "starting encounter runner");

    run(&config)
}

fn run(config: &CliConfig) -> Result<()> {
    let factory = ContentFactory::new(&config.data_dir);
    let game_config = match &config.config_path {
        Some(path) => ConfigLoader::load(path),
        None => factory.load_config(),
    }
    .context("loading balance configuration")?;
    let (encounter, layout) = factory
        .load_encounter(&config.roster)
        .with_context(|| format!("loading encounter '{}'", config.roster))?;

    let settings = SimulationConfig {
        game_config,
        seed: config.seed,
        autopilot: true,
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::from_encounter(settings, &encounter, layout)
        .context("spawning encounter")?;
    let mut deaths = simulation.subscribe(Topic::World(EventKind::UnitDied));

    let summary = simulation.run(config.max_steps)?;

    for event in events::drain(&mut deaths) {
        if let Event::World(WorldEvent::UnitDied { unit, killer }) = event {
            let name = unit_name(&simulation, unit);
            match killer {
                Some(killer) => {
                    tracing::info!(%name, killer = %unit_name(&simulation, killer), "unit died")
                }
                None => tracing::info!(%name, "unit died"),
            }
        }
    }

    let survivors: Vec<String> = summary
        .survivors
        .iter()
        .map(|id| unit_name(&simulation, *id))
        .collect();
    if summary.finished {
        tracing::info!(
            turns = summary.turns,
            steps = summary.steps,
            ?survivors,
            "encounter finished"
        );
    } else {
        tracing::warn!(
            turns = summary.turns,
            steps = summary.steps,
            ?survivors,
            "step limit reached before the encounter finished"
        );
    }
    Ok(())
}

fn unit_name(simulation: &Simulation, id: UnitId) -> String {
    simulation
        .world()
        .unit(id)
        .map_or_else(|| id.to_string(), |unit| unit.name.clone())
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `info`).
fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
