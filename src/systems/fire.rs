use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    grid::Grid,
    rng::SystemRng,
    world::WorldState,
};

/// Counts every burning tile down by one tick. A fire that runs out is put
/// out and costs the building one level, never going below level 1.
///
/// Returns how many fires went out.
pub fn tick_fire_timers(grid: &mut Grid) -> usize {
    let mut extinguished = 0;
    for tile in grid.tiles_mut().filter(|tile| tile.on_fire) {
        let remaining = tile.fire_timer.unwrap_or(1).saturating_sub(1);
        if remaining > 0 {
            tile.fire_timer = Some(remaining);
            continue;
        }
        tile.on_fire = false;
        tile.fire_timer = None;
        if tile.level > 1 {
            tile.level -= 1;
        }
        extinguished += 1;
    }
    extinguished
}

pub struct FireSystem;

impl FireSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FireSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FireSystem {
    fn name(&self) -> &str {
        "fire"
    }

    fn run(
        &mut self,
        ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let extinguished = tick_fire_timers(&mut world.grid);
        if extinguished > 0 {
            debug!(tick = ctx.tick, extinguished, "fires burned out");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuildingType;
    use crate::grid::{Tile, TileCoord};

    #[test]
    fn fire_burns_out_and_costs_a_level() {
        let coord = TileCoord::new(4, 4);
        let mut grid = Grid::new();
        let mut tile = Tile::with_building(BuildingType::School);
        tile.level = 2;
        tile.ignite(8);
        grid.set(coord, tile);

        for _ in 0..7 {
            assert_eq!(tick_fire_timers(&mut grid), 0);
            assert!(grid.get(coord).unwrap().on_fire);
        }
        assert_eq!(tick_fire_timers(&mut grid), 1);
        let tile = grid.get(coord).unwrap();
        assert!(!tile.on_fire);
        assert_eq!(tile.fire_timer, None);
        assert_eq!(tile.level, 1);
    }

    #[test]
    fn level_one_survives_fire() {
        let coord = TileCoord::new(0, 1);
        let mut grid = Grid::new();
        let mut tile = Tile::with_building(BuildingType::Park);
        tile.ignite(1);
        grid.set(coord, tile);
        tick_fire_timers(&mut grid);
        let tile = grid.get(coord).unwrap();
        assert_eq!(tile.level, 1);
        assert_eq!(tile.building_type, BuildingType::Park);
    }

    #[test]
    fn missing_timer_burns_out_immediately() {
        let coord = TileCoord::new(2, 2);
        let mut grid = Grid::new();
        let mut tile = Tile::with_building(BuildingType::Police);
        tile.on_fire = true;
        tile.level = 3;
        grid.set(coord, tile);
        tick_fire_timers(&mut grid);
        assert_eq!(grid.get(coord).unwrap().level, 2);
    }
}
