//! Per-frame interpolation.
//!
//! Frames only move citizens and smoke; they never touch the grid, the
//! treasury or citizen state. All state transitions happen in ticks.

use crate::citizen::CitizenState;
use crate::projection::ScreenPoint;
use crate::world::{Particle, WorldState};

/// Converts milliseconds into screen units per unit of speed.
pub const FRAME_SCALE: f64 = 0.06;
/// Citizens closer than this to their target snap onto it.
pub const SNAP_DISTANCE: f64 = 2.0;
/// One frame at 60 Hz.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Advances positions by `elapsed_ms`. A paused world does not move.
pub fn advance_frame(world: &mut WorldState, elapsed_ms: f64) {
    let dt = if world.is_paused() { 0.0 } else { elapsed_ms.max(0.0) };
    if dt == 0.0 {
        return;
    }

    for citizen in &mut world.citizens {
        if citizen.state == CitizenState::Visiting {
            continue;
        }
        let step = citizen.speed * dt * FRAME_SCALE;
        citizen.position = step_towards(citizen.position, citizen.target, step);
    }

    for particle in &mut world.particles {
        drift(particle, dt);
    }
    world.particles.retain(Particle::is_alive);
}

/// Plays `elapsed_ms` as a run of display-rate frames. Yields the same
/// positions as one long frame but keeps smoke ageing frame by frame.
pub fn advance_frames(world: &mut WorldState, elapsed_ms: f64) {
    let mut remaining = elapsed_ms.max(0.0);
    while remaining > 0.0 {
        let dt = remaining.min(FRAME_MS);
        advance_frame(world, dt);
        remaining -= dt;
    }
}

fn step_towards(from: ScreenPoint, to: ScreenPoint, step: f64) -> ScreenPoint {
    let dist = from.distance_to(to);
    if dist < SNAP_DISTANCE || step >= dist {
        return to;
    }
    ScreenPoint::new(
        from.x + (to.x - from.x) / dist * step,
        from.y + (to.y - from.y) / dist * step,
    )
}

fn drift(particle: &mut Particle, dt: f64) {
    particle.position.x += particle.velocity.x * dt * FRAME_SCALE;
    particle.position.y += particle.velocity.y * dt * FRAME_SCALE;
    particle.age += dt * FRAME_SCALE;
}
