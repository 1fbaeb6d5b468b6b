//! Tick throughput on a fully built city.
//!
//! Run with: cargo bench

use std::hint::black_box;
use std::time::Instant;

use minicity::{
    catalog::BUILD_ORDER, BuildingType, Engine, EngineSettings, Session, Tile, TileCoord,
    WorldState, GRID_SIZE,
};

const TICKS: u32 = 2_000;

fn packed_city() -> WorldState {
    let mut world = WorldState::new();
    let buildings: Vec<BuildingType> = BUILD_ORDER
        .iter()
        .copied()
        .filter(|ty| !ty.is_empty())
        .collect();
    for (i, coord) in (0..GRID_SIZE)
        .flat_map(|row| (0..GRID_SIZE).map(move |col| TileCoord::new(row, col)))
        .enumerate()
    {
        // every other tile is housing so the roster fills up
        let ty = if i % 2 == 0 {
            BuildingType::Residential
        } else {
            buildings[i % buildings.len()]
        };
        world.grid.set(coord, Tile::with_building(ty));
    }
    world
}

fn main() {
    let engine = Engine::standard(EngineSettings::headless("bench", 42));
    let mut session = Session::new(packed_city(), engine);
    // let the population settle before timing
    for _ in 0..200 {
        session.play_tick().unwrap();
    }

    let start = Instant::now();
    for _ in 0..TICKS {
        black_box(session.play_tick().unwrap());
    }
    let elapsed = start.elapsed();
    let world = session.world();
    println!(
        "{TICKS} ticks with {} citizens ({} visits so far): {:?} total, {:?} per tick",
        world.population(),
        world.total_visits,
        elapsed,
        elapsed / TICKS
    );
}
