use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use minicity::{
    engine::{Engine, EngineSettings},
    persistence,
    scenario::ScenarioLoader,
    session::Session,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless minicity simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/starter_town.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Start from a save file instead of the scenario's buildings
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a save file when the run finishes
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(scenario.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let world = match &cli.load {
        Some(path) => persistence::load(path)?,
        None => scenario.build_world()?,
    };
    let ticks = scenario.ticks(cli.ticks);
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: cli.seed.unwrap_or(scenario.seed),
        snapshot_interval_ticks: cli
            .snapshot_interval
            .unwrap_or(scenario.snapshot_interval_ticks),
        snapshot_dir: cli
            .snapshot_dir
            .unwrap_or_else(|| PathBuf::from("snapshots")),
    };
    info!(
        scenario = %scenario.name,
        seed = settings.seed,
        ticks,
        "starting run"
    );

    let mut session = Session::new(world, Engine::standard(settings));
    for _ in 0..ticks {
        session
            .play_tick()
            .with_context(|| format!("tick {} failed", session.world().tick))?;
    }

    if let Some(path) = &cli.save {
        session.save(path)?;
    }

    let world = session.world();
    println!(
        "Scenario '{}' ran {} ticks. Money: ${}, population: {}, happiness: {}%, visits: {}, achievements: {}",
        scenario.name,
        ticks,
        world.money,
        world.population(),
        world.happiness,
        world.total_visits,
        world.achievements.len()
    );
    Ok(())
}
