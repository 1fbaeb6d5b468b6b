//! Save files.
//!
//! Only the stable part of the world is stored. Citizens, particles, events
//! and notifications are dropped and regenerate after loading. Every field is
//! optional on load so older saves keep working.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    achievements::Achievement,
    catalog::{BuildingType, MAX_LEVEL},
    grid::{Grid, Tile},
    world::{Speed, WorldState, INITIAL_DAY_TIME, INITIAL_HAPPINESS, INITIAL_MONEY},
};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read save {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write save {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed save data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid tile at ({row}, {col}): {reason}")]
    InvalidTile {
        row: usize,
        col: usize,
        reason: String,
    },
}

fn default_money() -> i64 {
    INITIAL_MONEY
}

fn default_happiness() -> u32 {
    INITIAL_HAPPINESS
}

fn default_speed() -> Speed {
    Speed::Normal
}

fn default_day_time() -> f64 {
    INITIAL_DAY_TIME
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(default)]
    pub grid: Grid,
    #[serde(default = "default_money")]
    pub money: i64,
    /// Informational only; population is rebuilt from housing after loading.
    #[serde(default)]
    pub population: usize,
    #[serde(default = "default_happiness")]
    pub happiness: u32,
    #[serde(default)]
    pub tick: u64,
    #[serde(default = "default_speed")]
    pub speed: Speed,
    #[serde(default = "default_day_time")]
    pub day_time: f64,
    #[serde(default)]
    pub total_buildings: u64,
    #[serde(default)]
    pub total_money_earned: i64,
    #[serde(default)]
    pub total_visits: u64,
    #[serde(default)]
    pub achievements_unlocked: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SaveData {
    pub fn from_world(world: &WorldState, saved_at: DateTime<Utc>) -> Self {
        Self {
            grid: world.grid.clone(),
            money: world.money,
            population: world.population(),
            happiness: world.happiness,
            tick: world.tick,
            speed: world.speed,
            day_time: world.day_time,
            total_buildings: world.total_buildings,
            total_money_earned: world.total_money_earned,
            total_visits: world.total_visits,
            achievements_unlocked: world
                .achievements
                .iter()
                .map(|a| a.id().to_string())
                .collect(),
            saved_at: Some(saved_at),
        }
    }

    /// Rebuilds a world from the save. Fails on a tile level outside
    /// `1..=MAX_LEVEL`; inconsistent fire flags are put out.
    pub fn into_world(self) -> Result<WorldState, PersistenceError> {
        let mut world = WorldState::new();
        world.grid = self.grid;
        for coord in Grid::coords() {
            let Some(tile) = world.grid.get_mut(coord) else {
                continue;
            };
            if !(1..=MAX_LEVEL).contains(&tile.level) {
                return Err(PersistenceError::InvalidTile {
                    row: coord.row,
                    col: coord.col,
                    reason: format!("level {} outside 1..={MAX_LEVEL}", tile.level),
                });
            }
            settle_fire(tile);
        }
        world.money = self.money;
        world.happiness = self.happiness.min(100);
        world.tick = self.tick;
        world.speed = self.speed;
        world.day_time = self.day_time.rem_euclid(1.0);
        world.total_buildings = self.total_buildings;
        world.total_money_earned = self.total_money_earned;
        world.total_visits = self.total_visits;
        for id in &self.achievements_unlocked {
            match Achievement::from_id(id) {
                Some(achievement) => {
                    world.achievements.insert(achievement);
                }
                None => warn!(id = %id, "ignoring unknown achievement in save"),
            }
        }
        Ok(world)
    }
}

/// A tile keeps burning only with time left on its timer, and only if it is
/// a building that can burn.
fn settle_fire(tile: &mut Tile) {
    let burnable = !tile.is_empty() && tile.building_type != BuildingType::Road;
    match tile.fire_timer {
        Some(remaining) if tile.on_fire && burnable && remaining > 0 => {}
        _ => {
            tile.on_fire = false;
            tile.fire_timer = None;
        }
    }
}

pub fn to_json(world: &WorldState) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&SaveData::from_world(world, Utc::now()))?)
}

pub fn from_json(data: &str) -> Result<WorldState, PersistenceError> {
    let save: SaveData = serde_json::from_str(data)?;
    save.into_world()
}

pub fn save(world: &WorldState, path: &Path) -> Result<(), PersistenceError> {
    let json = to_json(world)?;
    fs::write(path, json).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), tick = world.tick, "game saved");
    Ok(())
}

pub fn load(path: &Path) -> Result<WorldState, PersistenceError> {
    let data = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let world = match from_json(&data) {
        Ok(world) => world,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "save rejected");
            return Err(err);
        }
    };
    info!(path = %path.display(), tick = world.tick, "game loaded");
    Ok(world)
}
