use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::{WorldState, NOTIFICATION_LIMIT},
};

/// Closes the tick: advances the counter and refreshes derived totals.
pub struct BookkeepingSystem;

impl BookkeepingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BookkeepingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &str {
        "bookkeeping"
    }

    fn run(
        &mut self,
        _ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        world.tick += 1;
        world.total_buildings = world.grid.count_non_empty() as u64;
        world.notifications.truncate(NOTIFICATION_LIMIT);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuildingType;
    use crate::engine::TickLedger;
    use crate::grid::{Tile, TileCoord};
    use crate::rng::RngManager;
    use crate::world::{Notification, Tone};

    #[test]
    fn closes_the_tick() {
        let mut world = WorldState::new();
        world
            .grid
            .set(TileCoord::new(1, 1), Tile::with_building(BuildingType::Park));
        for i in 0..NOTIFICATION_LIMIT + 5 {
            world.notifications.push_back(Notification {
                text: format!("note {i}"),
                tone: Tone::Neutral,
                tick: 0,
            });
        }
        let mut ctx = SystemContext {
            tick: 0,
            scenario_name: "test",
            ledger: TickLedger::default(),
        };
        BookkeepingSystem::new()
            .run(&mut ctx, &mut world, &mut RngManager::new(1).stream("bookkeeping"))
            .unwrap();

        assert_eq!(world.tick, 1);
        assert_eq!(world.total_buildings, 1);
        assert_eq!(world.notifications.len(), NOTIFICATION_LIMIT);
    }
}
