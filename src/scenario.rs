use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::info;

use crate::{
    catalog::{BuildingType, MAX_LEVEL},
    grid::{Tile, TileCoord},
    world::{Speed, WorldState, INITIAL_MONEY},
};

fn default_seed() -> u64 {
    42
}

fn default_starting_money() -> i64 {
    INITIAL_MONEY
}

fn default_speed() -> u8 {
    1
}

fn default_snapshot_interval_ticks() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_level() -> u8 {
    1
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("building at ({row}, {col}): {reason}")]
    InvalidBuilding {
        row: usize,
        col: usize,
        reason: String,
    },
    #[error("speed must be 0..=3, got {0}")]
    InvalidSpeed(u8),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_starting_money")]
    pub starting_money: i64,
    #[serde(default = "default_speed")]
    pub speed: u8,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub buildings: Vec<ScenarioBuilding>,
}

/// A building that exists when the scenario starts. Pre-placed buildings are
/// free.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioBuilding {
    #[serde(rename = "type")]
    pub building_type: BuildingType,
    pub row: usize,
    pub col: usize,
    #[serde(default = "default_level")]
    pub level: u8,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path).map_err(|source| ScenarioError::Read {
            path: path.clone(),
            source,
        })?;
        let scenario = Scenario::from_yaml(&data).map_err(|source| ScenarioError::Parse {
            path: path.clone(),
            source,
        })?;
        info!(
            scenario = %scenario.name,
            path = %path.display(),
            buildings = scenario.buildings.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml(data: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(data)
    }

    pub fn build_world(&self) -> Result<WorldState, ScenarioError> {
        let mut world = WorldState::new().with_money(self.starting_money);
        world.speed =
            Speed::from_level(self.speed).ok_or(ScenarioError::InvalidSpeed(self.speed))?;

        let mut occupied = HashSet::new();
        for building in &self.buildings {
            let coord = TileCoord::new(building.row, building.col);
            let invalid = |reason: &str| ScenarioError::InvalidBuilding {
                row: building.row,
                col: building.col,
                reason: reason.to_string(),
            };
            if !coord.in_bounds() {
                return Err(invalid("outside the grid"));
            }
            if building.building_type.is_empty() {
                return Err(invalid("empty is not a building"));
            }
            if !(1..=MAX_LEVEL).contains(&building.level) {
                return Err(invalid("level must be 1..=3"));
            }
            if !occupied.insert(coord) {
                return Err(invalid("tile listed twice"));
            }
            let mut tile = Tile::with_building(building.building_type);
            tile.level = building.level;
            world.grid.set(coord, tile);
        }
        world.total_buildings = world.grid.count_non_empty() as u64;
        Ok(world)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(240)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWN: &str = r#"
name: test_town
seed: 9
starting_money: 2500
buildings:
  - { type: residential, row: 0, col: 0 }
  - { type: commercial, row: 0, col: 1, level: 2 }
"#;

    #[test]
    fn defaults_fill_missing_keys() {
        let scenario = Scenario::from_yaml(TOWN).unwrap();
        assert_eq!(scenario.seed, 9);
        assert_eq!(scenario.speed, 1);
        assert_eq!(scenario.snapshot_interval_ticks, 60);
        assert_eq!(scenario.log_level, "info");
        assert_eq!(scenario.ticks(None), 240);
        assert_eq!(scenario.ticks(Some(5)), 5);
    }

    #[test]
    fn builds_world_with_free_buildings() {
        let world = Scenario::from_yaml(TOWN).unwrap().build_world().unwrap();
        assert_eq!(world.money, 2500);
        assert_eq!(world.total_buildings, 2);
        let shop = world.grid.get(TileCoord::new(0, 1)).unwrap();
        assert_eq!(shop.building_type, BuildingType::Commercial);
        assert_eq!(shop.level, 2);
    }

    #[test]
    fn rejects_overlapping_buildings() {
        let yaml = r#"
name: clash
buildings:
  - { type: park, row: 3, col: 3 }
  - { type: road, row: 3, col: 3 }
"#;
        let err = Scenario::from_yaml(yaml).unwrap().build_world().unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidBuilding { row: 3, col: 3, .. }));
    }

    #[test]
    fn rejects_out_of_range_level() {
        let yaml = r#"
name: tall
buildings:
  - { type: park, row: 1, col: 1, level: 4 }
"#;
        assert!(Scenario::from_yaml(yaml).unwrap().build_world().is_err());
    }

    #[test]
    fn unknown_building_type_fails_to_parse() {
        let yaml = r#"
name: odd
buildings:
  - { type: castle, row: 1, col: 1 }
"#;
        assert!(Scenario::from_yaml(yaml).is_err());
    }
}
