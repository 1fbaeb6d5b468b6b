use anyhow::Result;
use rand::Rng;

use crate::{
    catalog::BuildingType,
    engine::{System, SystemContext},
    grid::Grid,
    projection::{self, ScreenPoint},
    rng::SystemRng,
    world::{Particle, WorldState},
};

/// Smoke puffs emitted this tick by factories (busier ones smoke more) and
/// burning buildings.
pub fn spawn_smoke<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Vec<Particle> {
    let mut smoke = Vec::new();
    for (coord, tile) in grid.iter() {
        let origin = projection::grid_to_screen(coord);

        if tile.building_type == BuildingType::Industrial
            && rng.gen::<f64>() < 0.4 + tile.visitor_count as f64 * 0.1
        {
            let stack = if rng.gen::<f64>() > 0.5 { -8.0 } else { 6.0 };
            smoke.push(Particle {
                position: ScreenPoint::new(
                    origin.x + stack + (rng.gen::<f64>() - 0.5) * 3.0,
                    origin.y - 14.0 + (rng.gen::<f64>() - 0.5) * 2.0,
                ),
                age: 0.0,
                max_age: 60.0 + rng.gen::<f64>() * 40.0,
                velocity: ScreenPoint::new(
                    (rng.gen::<f64>() - 0.3) * 0.3,
                    -0.4 - rng.gen::<f64>() * 0.3,
                ),
                size: 3.0 + rng.gen::<f64>() * 3.0,
            });
        }

        if tile.on_fire && rng.gen::<f64>() < 0.4 {
            smoke.push(Particle {
                position: ScreenPoint::new(
                    origin.x + (rng.gen::<f64>() - 0.5) * 10.0,
                    origin.y - 5.0 + (rng.gen::<f64>() - 0.5) * 5.0,
                ),
                age: 0.0,
                max_age: 40.0 + rng.gen::<f64>() * 30.0,
                velocity: ScreenPoint::new(
                    (rng.gen::<f64>() - 0.5) * 0.5,
                    -0.6 - rng.gen::<f64>() * 0.4,
                ),
                size: 4.0 + rng.gen::<f64>() * 4.0,
            });
        }
    }
    smoke
}

pub struct EffectsSystem;

impl EffectsSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EffectsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for EffectsSystem {
    fn name(&self) -> &str {
        "effects"
    }

    fn run(
        &mut self,
        _ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let smoke = spawn_smoke(&world.grid, rng);
        world.particles.extend(smoke);
        Ok(())
    }
}
