use anyhow::Result;

use crate::{
    catalog::{level_multiplier, BuildingType},
    engine::{System, SystemContext},
    rng::SystemRng,
    world::WorldState,
};

const DEFAULT_SATISFACTION: f64 = 50.0;
const BURNING_PENALTY: f64 = 5.0;
const DIVERSITY_BONUS: f64 = 5.0;
const POLICE_BONUS: f64 = 2.0;
const SATISFACTION_WEIGHT: f64 = 0.7;

/// City happiness before event modifiers: 70% mean citizen satisfaction,
/// 30% building bonus around a neutral 50.
pub fn calculate_happiness(world: &WorldState) -> u32 {
    let satisfaction = world.average_satisfaction().unwrap_or(DEFAULT_SATISFACTION);

    let mut bonus: f64 = world
        .grid
        .tiles()
        .filter(|tile| !tile.is_empty())
        .map(|tile| {
            let effect = tile.info().happiness_effect * level_multiplier(tile.level) * 0.5;
            if tile.on_fire {
                effect - BURNING_PENALTY
            } else {
                effect
            }
        })
        .sum();

    let counts = world.grid.counts();
    if counts.get(BuildingType::Residential) > 0
        && counts.get(BuildingType::Commercial) > 0
        && counts.get(BuildingType::Industrial) > 0
    {
        bonus += DIVERSITY_BONUS;
    }
    bonus += counts.get(BuildingType::Police) as f64 * POLICE_BONUS;

    let combined =
        satisfaction * SATISFACTION_WEIGHT + (50.0 + bonus) * (1.0 - SATISFACTION_WEIGHT);
    combined.round().clamp(0.0, 100.0) as u32
}

pub struct HappinessSystem;

impl HappinessSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HappinessSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for HappinessSystem {
    fn name(&self) -> &str {
        "happiness"
    }

    fn run(
        &mut self,
        ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let base = calculate_happiness(world) as f64;
        world.happiness = (base + ctx.ledger.modifiers.happiness_add)
            .round()
            .clamp(0.0, 100.0) as u32;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Tile, TileCoord};

    #[test]
    fn empty_city_is_neutral() {
        assert_eq!(calculate_happiness(&WorldState::new()), 50);
    }

    #[test]
    fn parks_and_police_lift_happiness() {
        let mut world = WorldState::new();
        world
            .grid
            .set(TileCoord::new(0, 0), Tile::with_building(BuildingType::Park));
        world
            .grid
            .set(TileCoord::new(0, 1), Tile::with_building(BuildingType::Police));
        // bonus = 3 + 2 + 2 = 7 -> 35 + 17.1 = 52.1
        assert_eq!(calculate_happiness(&world), 52);
    }

    #[test]
    fn fires_hurt() {
        let mut world = WorldState::new();
        for col in 0..10 {
            let mut tile = Tile::with_building(BuildingType::Road);
            tile.ignite(4);
            world.grid.set(TileCoord::new(0, col), tile);
        }
        // bonus = -50 -> 35 + 0 = 35
        assert_eq!(calculate_happiness(&world), 35);
    }

    #[test]
    fn result_is_clamped() {
        let mut world = WorldState::new();
        for row in 0..14 {
            for col in 0..14 {
                let mut tile = Tile::with_building(BuildingType::Industrial);
                tile.ignite(5);
                world.grid.set(TileCoord::new(row, col), tile);
            }
        }
        assert_eq!(calculate_happiness(&world), 0);
    }
}
