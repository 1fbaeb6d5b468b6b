//! The live game.
//!
//! A [`Session`] owns the current world and the engine that advances it. A
//! driver feeds it wall-clock time; the session turns that into frames and,
//! at the cadence of the current speed, ticks. Player actions go through the
//! session so achievements are checked after every change.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::{
    achievements::{check_achievements, Achievement},
    animation,
    catalog::BuildingType,
    engine::Engine,
    grid::TileCoord,
    persistence::{self, PersistenceError},
    placement::{self, Rejected},
    world::{Speed, WorldState},
};

pub struct Session {
    world: WorldState,
    engine: Engine,
    /// Milliseconds accumulated towards the next tick.
    pending_ms: f64,
}

impl Session {
    pub fn new(world: WorldState, engine: Engine) -> Self {
        Self {
            world,
            engine,
            pending_ms: 0.0,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn into_world(self) -> WorldState {
        self.world
    }

    pub fn place(
        &mut self,
        coord: TileCoord,
        building_type: BuildingType,
    ) -> Result<(), Rejected> {
        self.world = placement::place_building(&self.world, coord, building_type)?;
        check_achievements(&mut self.world);
        Ok(())
    }

    pub fn upgrade(&mut self, coord: TileCoord) -> Result<(), Rejected> {
        self.world = placement::upgrade_building(&self.world, coord)?;
        check_achievements(&mut self.world);
        Ok(())
    }

    pub fn set_speed(&mut self, speed: Speed) {
        if speed != self.world.speed {
            info!(from = self.world.speed.level(), to = speed.level(), "speed changed");
        }
        self.world.speed = speed;
        if speed.is_paused() {
            self.pending_ms = 0.0;
        }
    }

    /// Runs one tick immediately, regardless of cadence. Returns the
    /// achievements it unlocked.
    pub fn tick(&mut self) -> Result<Vec<Achievement>> {
        self.world = self.engine.step(&self.world)?;
        Ok(check_achievements(&mut self.world))
    }

    /// Runs one tick and then animates the time the current speed leaves
    /// before the next one. This is what a display driver does between two
    /// ticks, compressed for headless runs.
    pub fn play_tick(&mut self) -> Result<Vec<Achievement>> {
        let unlocked = self.tick()?;
        if let Some(interval) = self.world.speed.tick_interval() {
            animation::advance_frames(&mut self.world, interval.as_secs_f64() * 1000.0);
        }
        Ok(unlocked)
    }

    /// Feeds `elapsed_ms` of wall-clock time: runs as many ticks as the
    /// current speed allows, then one animation frame. Returns the number of
    /// ticks run.
    pub fn advance(&mut self, elapsed_ms: f64) -> Result<u32> {
        let Some(interval) = self.world.speed.tick_interval() else {
            animation::advance_frame(&mut self.world, 0.0);
            return Ok(0);
        };
        let interval_ms = interval.as_secs_f64() * 1000.0;
        self.pending_ms += elapsed_ms.max(0.0);

        let mut ticks = 0;
        while self.pending_ms >= interval_ms {
            self.pending_ms -= interval_ms;
            self.tick()?;
            ticks += 1;
        }
        animation::advance_frame(&mut self.world, elapsed_ms);
        Ok(ticks)
    }

    /// Starts over with an empty city, keeping the engine.
    pub fn new_game(&mut self) {
        self.world = WorldState::new();
        self.pending_ms = 0.0;
        info!("new game started");
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save(&self.world, path)
    }

    /// Replaces the current world with a saved one. Citizens respawn over the
    /// following ticks.
    pub fn load(&mut self, path: &Path) -> Result<(), PersistenceError> {
        self.world = persistence::load(path)?;
        self.pending_ms = 0.0;
        check_achievements(&mut self.world);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineSettings;

    fn session() -> Session {
        Session::new(
            WorldState::new(),
            Engine::standard(EngineSettings::headless("session", 3)),
        )
    }

    #[test]
    fn cadence_follows_speed() {
        let mut session = session();
        assert_eq!(session.advance(1999.0).unwrap(), 0);
        assert_eq!(session.advance(1.0).unwrap(), 1);

        session.set_speed(Speed::Turbo);
        assert_eq!(session.advance(1600.0).unwrap(), 3);
        assert_eq!(session.world().tick, 4);
    }

    #[test]
    fn played_ticks_clear_out_smoke() {
        let mut session = session();
        session
            .place(TileCoord::new(2, 2), BuildingType::Industrial)
            .unwrap();
        for _ in 0..30 {
            session.play_tick().unwrap();
        }
        // every puff outlives less than one normal-speed interval
        assert!(session.world().particles.is_empty());
        assert_eq!(session.world().tick, 30);
    }

    #[test]
    fn paused_session_does_nothing() {
        let mut session = session();
        session.set_speed(Speed::Paused);
        let before = session.world().clone();
        assert_eq!(session.advance(60_000.0).unwrap(), 0);
        assert_eq!(session.world(), &before);
    }

    #[test]
    fn placing_a_house_unlocks_first_home() {
        let mut session = session();
        session
            .place(TileCoord::new(0, 0), BuildingType::Residential)
            .unwrap();
        assert!(session.world().achievements.contains(&Achievement::FirstHouse));
        assert_eq!(session.world().notifications.len(), 1);
    }

    #[test]
    fn rejected_action_keeps_world() {
        let mut session = session();
        let before = session.world().clone();
        assert_eq!(
            session.place(TileCoord::new(0, 0), BuildingType::Empty),
            Err(Rejected)
        );
        assert_eq!(session.world(), &before);
    }
}
