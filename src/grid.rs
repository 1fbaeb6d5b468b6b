use serde::{Deserialize, Serialize};

use crate::catalog::{BuildingInfo, BuildingType};

/// Tiles per side of the square city grid.
pub const GRID_SIZE: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub row: usize,
    pub col: usize,
}

impl TileCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }
}

/// One grid cell. Field names follow the persisted save layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(rename = "type", default = "default_building_type")]
    pub building_type: BuildingType,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default, skip_serializing_if = "is_false")]
    pub on_fire: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fire_timer: Option<u32>,
    /// Per-tick census of citizens inside; rebuilt from zero every tick.
    #[serde(rename = "visitors", default)]
    pub visitor_count: u32,
    #[serde(default)]
    pub total_visits: u64,
    #[serde(rename = "revenue", default)]
    pub revenue_this_tick: i64,
}

fn default_building_type() -> BuildingType {
    BuildingType::Empty
}

fn default_level() -> u8 {
    1
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Default for Tile {
    fn default() -> Self {
        Self::empty()
    }
}

impl Tile {
    pub fn empty() -> Self {
        Self::with_building(BuildingType::Empty)
    }

    /// A freshly placed level 1 building with no history.
    pub fn with_building(building_type: BuildingType) -> Self {
        Self {
            building_type,
            level: 1,
            on_fire: false,
            fire_timer: None,
            visitor_count: 0,
            total_visits: 0,
            revenue_this_tick: 0,
        }
    }

    pub fn info(&self) -> &'static BuildingInfo {
        self.building_type.info()
    }

    pub fn is_empty(&self) -> bool {
        self.building_type.is_empty()
    }

    pub fn effective_capacity(&self) -> u32 {
        self.info().effective_capacity(self.level)
    }

    pub fn has_room(&self) -> bool {
        self.visitor_count < self.effective_capacity()
    }

    pub fn ignite(&mut self, ticks: u32) {
        self.on_fire = true;
        self.fire_timer = Some(ticks);
    }
}

/// Fixed-size square grid stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Tile>>", into = "Vec<Vec<Tile>>")]
pub struct Grid {
    tiles: Vec<Tile>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            tiles: vec![Tile::empty(); GRID_SIZE * GRID_SIZE],
        }
    }

    fn index(coord: TileCoord) -> Option<usize> {
        coord
            .in_bounds()
            .then(|| coord.row * GRID_SIZE + coord.col)
    }

    pub fn get(&self, coord: TileCoord) -> Option<&Tile> {
        Self::index(coord).and_then(|idx| self.tiles.get(idx))
    }

    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        Self::index(coord).and_then(move |idx| self.tiles.get_mut(idx))
    }

    pub fn set(&mut self, coord: TileCoord, tile: Tile) -> bool {
        match self.get_mut(coord) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    pub fn building_at(&self, coord: TileCoord) -> Option<BuildingType> {
        self.get(coord).map(|tile| tile.building_type)
    }

    pub fn coords() -> impl Iterator<Item = TileCoord> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| TileCoord::new(row, col)))
    }

    /// Tiles in row-major order paired with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &Tile)> {
        Self::coords().zip(self.tiles.iter())
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    pub fn coords_of(&self, building_type: BuildingType) -> Vec<TileCoord> {
        self.iter()
            .filter(|(_, tile)| tile.building_type == building_type)
            .map(|(coord, _)| coord)
            .collect()
    }

    pub fn count_non_empty(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.is_empty()).count()
    }

    pub fn counts(&self) -> BuildingCounts {
        let mut counts = BuildingCounts::default();
        for tile in &self.tiles {
            counts.add(tile.building_type);
        }
        counts
    }
}

impl TryFrom<Vec<Vec<Tile>>> for Grid {
    type Error = String;

    fn try_from(rows: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        if rows.len() != GRID_SIZE {
            return Err(format!(
                "grid must have {GRID_SIZE} rows, found {}",
                rows.len()
            ));
        }
        let mut tiles = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != GRID_SIZE {
                return Err(format!(
                    "grid row {index} must have {GRID_SIZE} tiles, found {}",
                    row.len()
                ));
            }
            tiles.extend(row);
        }
        Ok(Self { tiles })
    }
}

impl From<Grid> for Vec<Vec<Tile>> {
    fn from(grid: Grid) -> Self {
        grid.tiles
            .chunks(GRID_SIZE)
            .map(|row| row.to_vec())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildingCounts([usize; BuildingType::COUNT]);

impl BuildingCounts {
    // discriminants follow `BuildingType::ALL`
    fn add(&mut self, building_type: BuildingType) {
        self.0[building_type as usize] += 1;
    }

    pub fn get(&self, building_type: BuildingType) -> usize {
        self.0[building_type as usize]
    }
}
