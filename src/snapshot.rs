use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::{
    achievements::Achievement,
    citizen::CitizenState,
    events::EventKind,
    world::WorldState,
};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only summary of a world, emitted to hooks and snapshot files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub money: i64,
    pub population: usize,
    pub happiness: u32,
    pub day_time: f64,
    pub time_of_day: &'static str,
    pub income_this_tick: i64,
    pub upkeep_this_tick: i64,
    pub total_buildings: u64,
    pub total_money_earned: i64,
    pub total_visits: u64,
    pub burning_tiles: usize,
    pub citizens: CitizenCensus,
    pub events: Vec<ActiveEvent>,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CitizenCensus {
    pub idle: usize,
    pub walking: usize,
    pub visiting: usize,
    pub returning: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveEvent {
    pub kind: EventKind,
    pub remaining_ticks: u32,
}

impl WorldSnapshot {
    pub fn from_world(world: &WorldState) -> Self {
        let mut citizens = CitizenCensus::default();
        for citizen in &world.citizens {
            match citizen.state {
                CitizenState::Idle => citizens.idle += 1,
                CitizenState::Walking => citizens.walking += 1,
                CitizenState::Visiting => citizens.visiting += 1,
                CitizenState::Returning => citizens.returning += 1,
            }
        }
        Self {
            tick: world.tick,
            money: world.money,
            population: world.population(),
            happiness: world.happiness,
            day_time: world.day_time,
            time_of_day: world.time_of_day(),
            income_this_tick: world.income_this_tick,
            upkeep_this_tick: world.upkeep_this_tick,
            total_buildings: world.total_buildings,
            total_money_earned: world.total_money_earned,
            total_visits: world.total_visits,
            burning_tiles: world.grid.tiles().filter(|tile| tile.on_fire).count(),
            citizens,
            events: world
                .events
                .iter()
                .map(|event| ActiveEvent {
                    kind: event.kind,
                    remaining_ticks: event.duration,
                })
                .collect(),
            achievements: world.achievements.iter().copied().collect(),
        }
    }
}

/// Writes `dir/<scenario>/tick_NNNNNN.json` every `interval_ticks` ticks.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: &Path, interval_ticks: u64) -> Self {
        Self {
            dir: dir.to_path_buf(),
            interval_ticks,
        }
    }

    pub fn maybe_write(
        &self,
        world: &WorldState,
        scenario_name: &str,
    ) -> Result<Option<PathBuf>, SnapshotError> {
        if self.interval_ticks == 0 || world.tick == 0 || world.tick % self.interval_ticks != 0 {
            return Ok(None);
        }
        let dir = self.dir.join(scenario_name);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("tick_{:06}.json", world.tick));
        let json = serde_json::to_string_pretty(&WorldSnapshot::from_world(world))?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), tick = world.tick, "snapshot written");
        Ok(Some(path))
    }
}
