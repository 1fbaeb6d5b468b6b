use anyhow::Result;
use rand::Rng;
use tracing::debug;

use crate::{
    catalog::{level_multiplier, BuildingType},
    citizen::{Citizen, CitizenState},
    engine::{System, SystemContext},
    events::EventModifiers,
    grid::Grid,
    rng::SystemRng,
    world::WorldState,
};

/// New citizens per tick are capped so towns fill up gradually.
pub const MAX_SPAWNS_PER_TICK: usize = 2;

/// Housing capacity of every residential tile, level-scaled and floored once.
pub fn population_capacity(grid: &Grid) -> usize {
    let housing: f64 = grid
        .tiles()
        .filter(|tile| tile.building_type == BuildingType::Residential)
        .map(|tile| tile.info().pop_capacity as f64 * level_multiplier(tile.level))
        .sum();
    housing.floor() as usize
}

pub struct PopulationSystem;

impl PopulationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PopulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PopulationSystem {
    fn name(&self) -> &str {
        "population"
    }

    fn run(
        &mut self,
        ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let surge = EventModifiers::fold(&world.events).pop_add as usize;
        let capacity = population_capacity(&world.grid) + surge;
        let homes = world.grid.coords_of(BuildingType::Residential);

        let mut spawned = 0;
        while world.citizens.len() < capacity && !homes.is_empty() && spawned < MAX_SPAWNS_PER_TICK
        {
            let home = homes[rng.gen_range(0..homes.len())];
            let citizen = Citizen::spawn(world.next_citizen_id, home, rng);
            world.next_citizen_id += 1;
            world.citizens.push(citizen);
            spawned += 1;
        }

        let mut removed = 0;
        while world.citizens.len() > capacity {
            match world
                .citizens
                .iter()
                .position(|c| c.state == CitizenState::Idle)
            {
                Some(idx) => {
                    world.citizens.remove(idx);
                }
                None => {
                    world.citizens.pop();
                }
            }
            removed += 1;
        }

        let grid = &world.grid;
        let before = world.citizens.len();
        world
            .citizens
            .retain(|c| grid.building_at(c.home) == Some(BuildingType::Residential));
        let homeless = before - world.citizens.len();

        if spawned + removed + homeless > 0 {
            debug!(
                tick = ctx.tick,
                capacity,
                spawned,
                removed,
                homeless,
                population = world.citizens.len(),
                "population adjusted"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TickLedger;
    use crate::events::{EventKind, GameEvent};
    use crate::grid::{Tile, TileCoord};
    use crate::rng::RngManager;

    fn run_once(world: &mut WorldState) {
        let mut rng = RngManager::new(3);
        let mut ctx = SystemContext {
            tick: world.tick,
            scenario_name: "test",
            ledger: TickLedger::default(),
        };
        PopulationSystem::new()
            .run(&mut ctx, world, &mut rng.stream("population"))
            .unwrap();
    }

    #[test]
    fn capacity_scales_with_level() {
        let mut grid = Grid::new();
        let mut house = Tile::with_building(BuildingType::Residential);
        house.level = 2;
        grid.set(TileCoord::new(0, 0), house);
        grid.set(TileCoord::new(0, 1), Tile::with_building(BuildingType::Residential));
        assert_eq!(population_capacity(&grid), 6 + 4);
    }

    #[test]
    fn spawns_at_most_two_per_tick() {
        let mut world = WorldState::new();
        world
            .grid
            .set(TileCoord::new(1, 1), Tile::with_building(BuildingType::Residential));
        run_once(&mut world);
        assert_eq!(world.population(), 2);
        assert_eq!(world.next_citizen_id, 3);
        run_once(&mut world);
        assert_eq!(world.population(), 4);
        run_once(&mut world);
        assert_eq!(world.population(), 4);
        let ids: Vec<u64> = world.citizens.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn demolished_homes_evict_residents() {
        let mut world = WorldState::new();
        let home = TileCoord::new(1, 1);
        world
            .grid
            .set(home, Tile::with_building(BuildingType::Residential));
        run_once(&mut world);
        world.grid.set(home, Tile::empty());
        run_once(&mut world);
        assert_eq!(world.population(), 0);
        assert_eq!(world.next_citizen_id, 3, "ids are never reused");
    }

    fn crowded_house(states: [CitizenState; 5]) -> WorldState {
        let mut world = WorldState::new();
        let home = TileCoord::new(1, 1);
        world
            .grid
            .set(home, Tile::with_building(BuildingType::Residential));
        let mut rng = RngManager::new(8);
        for (i, state) in states.into_iter().enumerate() {
            let mut citizen = Citizen::spawn(i as u64 + 1, home, &mut rng.stream("crowd"));
            citizen.state = state;
            world.citizens.push(citizen);
        }
        world.next_citizen_id = 6;
        world
    }

    #[test]
    fn idle_citizens_leave_first() {
        use CitizenState::*;
        let mut world = crowded_house([Walking, Visiting, Idle, Walking, Returning]);
        run_once(&mut world);
        let ids: Vec<u64> = world.citizens.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[test]
    fn busy_surplus_drops_the_newest() {
        use CitizenState::*;
        let mut world = crowded_house([Walking, Visiting, Walking, Walking, Returning]);
        run_once(&mut world);
        let ids: Vec<u64> = world.citizens.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn surge_raises_capacity() {
        let mut world = WorldState::new();
        world
            .grid
            .set(TileCoord::new(1, 1), Tile::with_building(BuildingType::Residential));
        world.events.push(GameEvent::new(EventKind::PopulationSurge));
        for _ in 0..20 {
            run_once(&mut world);
        }
        assert_eq!(world.population(), 24);
    }
}
