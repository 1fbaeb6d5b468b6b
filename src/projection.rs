//! Isometric grid-to-screen projection.
//!
//! Citizens move in screen space, so the simulation needs the same projection
//! the renderer uses to turn tile coordinates into movement targets.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::TileCoord;

pub const TILE_WIDTH: f64 = 64.0;
pub const TILE_HEIGHT: f64 = 32.0;
pub const HALF_WIDTH: f64 = TILE_WIDTH / 2.0;
pub const HALF_HEIGHT: f64 = TILE_HEIGHT / 2.0;

/// Screen-space distance under which a tick treats a citizen as arrived.
pub const ARRIVAL_EPSILON: f64 = 4.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: ScreenPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Top corner of the tile's diamond.
pub fn grid_to_screen(coord: TileCoord) -> ScreenPoint {
    let row = coord.row as f64;
    let col = coord.col as f64;
    ScreenPoint::new((col - row) * HALF_WIDTH, (col + row) * HALF_HEIGHT)
}

/// Centre of the tile's diamond, where citizens idle at home.
pub fn tile_anchor(coord: TileCoord) -> ScreenPoint {
    let corner = grid_to_screen(coord);
    ScreenPoint::new(corner.x, corner.y + HALF_HEIGHT)
}

/// A jittered wander point on the tile.
pub fn random_near_tile<R: Rng + ?Sized>(coord: TileCoord, rng: &mut R) -> ScreenPoint {
    let anchor = tile_anchor(coord);
    ScreenPoint::new(
        anchor.x + (rng.gen::<f64>() - 0.5) * HALF_WIDTH * 0.8,
        anchor.y + (rng.gen::<f64>() - 0.5) * HALF_HEIGHT * 0.5,
    )
}
