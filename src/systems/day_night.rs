use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::WorldState,
};

/// Ticks in one full day.
pub const DAY_LENGTH_TICKS: f64 = 120.0;

pub fn advance_day_time(day_time: f64) -> f64 {
    (day_time + 1.0 / DAY_LENGTH_TICKS) % 1.0
}

pub struct DayNightSystem;

impl DayNightSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DayNightSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DayNightSystem {
    fn name(&self) -> &str {
        "day_night"
    }

    fn run(
        &mut self,
        _ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        world.day_time = advance_day_time(world.day_time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_wraps_after_a_day() {
        let mut t = 0.0;
        for _ in 0..120 {
            t = advance_day_time(t);
            assert!((0.0..1.0).contains(&t));
        }
        assert!(t < 1e-9 || (1.0 - t) < 1e-9);
    }
}
