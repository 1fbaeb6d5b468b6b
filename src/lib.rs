pub mod achievements;
pub mod animation;
pub mod catalog;
pub mod citizen;
pub mod engine;
pub mod events;
pub mod grid;
pub mod persistence;
pub mod placement;
pub mod projection;
pub mod rng;
pub mod scenario;
pub mod session;
pub mod snapshot;
pub mod systems;
pub mod world;

pub use catalog::{BuildingType, Need};
pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use grid::{Grid, Tile, TileCoord, GRID_SIZE};
pub use placement::{building_stats, place_building, upgrade_building, Rejected};
pub use scenario::{Scenario, ScenarioLoader};
pub use session::Session;
pub use world::{Speed, WorldState};
