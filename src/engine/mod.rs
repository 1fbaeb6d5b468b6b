use std::path::PathBuf;

use anyhow::Result;
use tracing::trace;

use crate::{
    events::EventModifiers,
    rng::{RngManager, SystemRng},
    snapshot::{SnapshotWriter, WorldSnapshot},
    systems::{
        BookkeepingSystem, CitizenSystem, DayNightSystem, EconomySystem, EffectsSystem,
        EventSystem, FireSystem, HappinessSystem, PopulationSystem,
    },
    world::WorldState,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    /// Zero disables snapshots.
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

impl EngineSettings {
    /// Settings for an engine that never writes snapshots.
    pub fn headless(scenario_name: impl Into<String>, seed: u64) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            seed,
            snapshot_interval_ticks: 0,
            snapshot_dir: PathBuf::from("snapshots"),
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    /// Registers the full tick pipeline in canonical order.
    pub fn with_standard_systems(self) -> Self {
        self.with_system(DayNightSystem::new())
            .with_system(FireSystem::new())
            .with_system(PopulationSystem::new())
            .with_system(CitizenSystem::new())
            .with_system(EventSystem::new())
            .with_system(EconomySystem::new())
            .with_system(HappinessSystem::new())
            .with_system(EffectsSystem::new())
            .with_system(BookkeepingSystem::new())
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    pub fn standard(settings: EngineSettings) -> Self {
        EngineBuilder::new(settings).with_standard_systems().build()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    /// Advances one tick and returns the next world. The input is never
    /// modified; a paused world comes back unchanged.
    pub fn step(&mut self, world: &WorldState) -> Result<WorldState> {
        if world.is_paused() {
            return Ok(world.clone());
        }
        let mut next = world.clone();
        let mut ctx = SystemContext {
            tick: world.tick,
            scenario_name: &self.settings.scenario_name,
            ledger: TickLedger::default(),
        };
        for system in &mut self.systems {
            let mut rng_stream = self.rng.stream(system.name());
            system.run(&mut ctx, &mut next, &mut rng_stream)?;
            trace!(system = system.name(), tick = ctx.tick, "system finished");
        }
        self.snapshot_writer
            .maybe_write(&next, &self.settings.scenario_name)?;
        Ok(next)
    }

    /// Runs `ticks` steps back to back. No frames run in between, so
    /// citizens do not move; [`crate::session::Session::play_tick`] drives both.
    pub fn run(&mut self, world: &WorldState, ticks: u64) -> Result<WorldState> {
        self.run_with_hook(world, ticks, |_| {})
    }

    /// Like [`Engine::run`], handing a snapshot of every produced world to `hook`.
    pub fn run_with_hook<F>(
        &mut self,
        world: &WorldState,
        ticks: u64,
        mut hook: F,
    ) -> Result<WorldState>
    where
        F: FnMut(&WorldSnapshot),
    {
        let mut current = world.clone();
        for _ in 0..ticks {
            current = self.step(&current)?;
            hook(&WorldSnapshot::from_world(&current));
        }
        Ok(current)
    }
}

/// Values produced by one system and consumed by a later one in the same tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickLedger {
    /// Sum of completed-visit payouts before event and school scaling.
    pub visit_revenue: i64,
    pub visits: u64,
    /// Combined effect of the events active when the tick started.
    pub modifiers: EventModifiers,
}

pub struct SystemContext<'a> {
    /// Tick number the world had when this step started.
    pub tick: u64,
    pub scenario_name: &'a str,
    pub ledger: TickLedger,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Speed;

    #[test]
    fn standard_pipeline_order() {
        let engine = Engine::standard(EngineSettings::headless("order", 1));
        assert_eq!(
            engine.system_names(),
            vec![
                "day_night",
                "fire",
                "population",
                "citizens",
                "events",
                "economy",
                "happiness",
                "effects",
                "bookkeeping"
            ]
        );
    }

    #[test]
    fn step_advances_tick_without_touching_input() {
        let mut engine = Engine::standard(EngineSettings::headless("step", 1));
        let world = WorldState::new();
        let next = engine.step(&world).unwrap();
        assert_eq!(world.tick, 0);
        assert_eq!(next.tick, 1);
    }

    #[test]
    fn paused_world_is_returned_unchanged() {
        let mut engine = Engine::standard(EngineSettings::headless("paused", 1));
        let mut world = WorldState::new();
        world.speed = Speed::Paused;
        assert_eq!(engine.step(&world).unwrap(), world);
    }

    struct Counter(u32);

    impl System for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn run(
            &mut self,
            _ctx: &mut SystemContext<'_>,
            world: &mut WorldState,
            _rng: &mut SystemRng<'_>,
        ) -> Result<()> {
            self.0 += 1;
            world.money += 1;
            Ok(())
        }
    }

    #[test]
    fn custom_systems_run_once_per_tick() {
        let mut engine = EngineBuilder::new(EngineSettings::headless("custom", 1))
            .with_system(Counter(0))
            .build();
        let world = engine.run(&WorldState::new(), 5).unwrap();
        assert_eq!(world.money, 1005);
        assert_eq!(world.tick, 0, "tick is owned by bookkeeping");
    }
}
