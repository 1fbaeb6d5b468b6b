use anyhow::Result;
use tracing::debug;

use crate::{
    catalog::{level_multiplier, BuildingType},
    engine::{System, SystemContext},
    grid::Grid,
    rng::SystemRng,
    world::WorldState,
};

/// Grid-wide upkeep, level-scaled and rounded once.
pub fn calculate_upkeep(grid: &Grid) -> i64 {
    let upkeep: f64 = grid
        .tiles()
        .filter(|tile| !tile.is_empty())
        .map(|tile| tile.info().upkeep_per_tick * level_multiplier(tile.level))
        .sum();
    upkeep.round() as i64
}

/// Every school adds 10% to visit revenue.
pub fn school_bonus(grid: &Grid) -> f64 {
    1.0 + grid.counts().get(BuildingType::School) as f64 * 0.1
}

pub struct EconomySystem;

impl EconomySystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EconomySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for EconomySystem {
    fn name(&self) -> &str {
        "economy"
    }

    fn run(
        &mut self,
        ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let upkeep = calculate_upkeep(&world.grid);
        let revenue = (ctx.ledger.visit_revenue as f64
            * ctx.ledger.modifiers.income_mult
            * school_bonus(&world.grid))
        .round() as i64;

        world.money += revenue - upkeep;
        world.total_money_earned += revenue.max(0);
        world.total_visits += ctx.ledger.visits;
        world.income_this_tick = revenue;
        world.upkeep_this_tick = upkeep;

        debug!(
            tick = ctx.tick,
            revenue,
            upkeep,
            money = world.money,
            "treasury updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TickLedger;
    use crate::events::EventModifiers;
    use crate::grid::{Tile, TileCoord};
    use crate::rng::RngManager;

    #[test]
    fn upkeep_rounds_once() {
        let mut grid = Grid::new();
        let mut factory = Tile::with_building(BuildingType::Industrial);
        factory.level = 2;
        grid.set(TileCoord::new(0, 0), factory);
        grid.set(TileCoord::new(0, 1), Tile::with_building(BuildingType::Road));
        grid.set(TileCoord::new(0, 2), Tile::with_building(BuildingType::Park));
        // 7.5 + 0 + 1
        assert_eq!(calculate_upkeep(&grid), 9);
    }

    #[test]
    fn revenue_is_scaled_by_events_and_schools() {
        let mut world = WorldState::new();
        world
            .grid
            .set(TileCoord::new(0, 0), Tile::with_building(BuildingType::School));
        world
            .grid
            .set(TileCoord::new(0, 1), Tile::with_building(BuildingType::School));

        let mut rng = RngManager::new(1);
        let mut ctx = SystemContext {
            tick: 0,
            scenario_name: "test",
            ledger: TickLedger {
                visit_revenue: 40,
                visits: 4,
                modifiers: EventModifiers {
                    income_mult: 1.5,
                    ..EventModifiers::default()
                },
            },
        };
        EconomySystem::new()
            .run(&mut ctx, &mut world, &mut rng.stream("economy"))
            .unwrap();

        // round(40 * 1.5 * 1.2) = 72, upkeep 2 * 4 = 8
        assert_eq!(world.income_this_tick, 72);
        assert_eq!(world.upkeep_this_tick, 8);
        assert_eq!(world.money, 1000 + 72 - 8);
        assert_eq!(world.total_money_earned, 72);
        assert_eq!(world.total_visits, 4);
        assert_eq!(world.income(), 64);
    }

    #[test]
    fn losses_do_not_reduce_lifetime_earnings() {
        let mut world = WorldState::new();
        world
            .grid
            .set(TileCoord::new(0, 0), Tile::with_building(BuildingType::Power));
        let mut rng = RngManager::new(1);
        let mut ctx = SystemContext {
            tick: 0,
            scenario_name: "test",
            ledger: TickLedger::default(),
        };
        EconomySystem::new()
            .run(&mut ctx, &mut world, &mut rng.stream("economy"))
            .unwrap();
        assert_eq!(world.money, 992);
        assert_eq!(world.total_money_earned, 0);
    }
}
