use anyhow::Result;
use rand::Rng;
use tracing::debug;

use crate::{
    catalog::BuildingType,
    engine::{System, SystemContext},
    events::{age_events, roll_event, EventKind, EventModifiers, GameEvent, FIRE_DURATION},
    grid::{Grid, TileCoord},
    rng::SystemRng,
    world::WorldState,
};

/// Sets fire to a random built, non-road tile that is not already burning.
pub fn ignite_random_building<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
) -> Option<TileCoord> {
    let candidates: Vec<TileCoord> = grid
        .iter()
        .filter(|(_, tile)| {
            !tile.is_empty() && tile.building_type != BuildingType::Road && !tile.on_fire
        })
        .map(|(coord, _)| coord)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let coord = candidates[rng.gen_range(0..candidates.len())];
    grid.get_mut(coord)?.ignite(FIRE_DURATION);
    Some(coord)
}

pub struct EventSystem;

impl EventSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for EventSystem {
    fn name(&self) -> &str {
        "events"
    }

    fn run(
        &mut self,
        ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        // events expiring this tick still count towards it
        ctx.ledger.modifiers = EventModifiers::fold(&world.events);
        let active_at_start = world.events.len();
        world.events = age_events(std::mem::take(&mut world.events));

        let fire_stations = world.grid.counts().get(BuildingType::FireStation);
        let Some(kind) = roll_event(
            rng,
            world.grid.count_non_empty(),
            active_at_start,
            fire_stations,
        ) else {
            return Ok(());
        };

        let event = GameEvent::new(kind);
        world.notify(event.headline(), kind.tone());
        if kind == EventKind::Fire {
            let site = ignite_random_building(&mut world.grid, rng);
            debug!(tick = ctx.tick, ?site, "fire broke out");
        }
        debug!(tick = ctx.tick, kind = ?kind, duration = event.duration, "event started");
        world.events.push(event);
        Ok(())
    }
}
