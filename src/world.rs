use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    achievements::Achievement,
    citizen::Citizen,
    events::GameEvent,
    grid::Grid,
    projection::ScreenPoint,
};

pub const INITIAL_MONEY: i64 = 1000;
pub const INITIAL_HAPPINESS: u32 = 50;
pub const INITIAL_DAY_TIME: f64 = 0.35;
pub const NOTIFICATION_LIMIT: usize = 20;

/// Simulation rate. Serialized as its numeric level, 0 (paused) to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Speed {
    Paused,
    Normal,
    Fast,
    Turbo,
}

impl Speed {
    pub fn level(self) -> u8 {
        match self {
            Speed::Paused => 0,
            Speed::Normal => 1,
            Speed::Fast => 2,
            Speed::Turbo => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Speed::Paused),
            1 => Some(Speed::Normal),
            2 => Some(Speed::Fast),
            3 => Some(Speed::Turbo),
            _ => None,
        }
    }

    /// Wall-clock time between ticks; `None` while paused.
    pub fn tick_interval(self) -> Option<Duration> {
        match self {
            Speed::Paused => None,
            Speed::Normal => Some(Duration::from_millis(2000)),
            Speed::Fast => Some(Duration::from_millis(1000)),
            Speed::Turbo => Some(Duration::from_millis(500)),
        }
    }

    pub fn is_paused(self) -> bool {
        self == Speed::Paused
    }
}

impl TryFrom<u8> for Speed {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Speed::from_level(level).ok_or_else(|| format!("speed must be 0..=3, got {level}"))
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> Self {
        speed.level()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    Night,
    Dawn,
    Day,
    Dusk,
}

impl DayPhase {
    pub fn from_time(day_time: f64) -> Self {
        match day_time {
            t if t < 0.2 => DayPhase::Night,
            t if t < 0.3 => DayPhase::Dawn,
            t if t < 0.7 => DayPhase::Day,
            t if t < 0.8 => DayPhase::Dusk,
            _ => DayPhase::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayPhase::Night => "Night",
            DayPhase::Dawn => "Dawn",
            DayPhase::Day => "Day",
            DayPhase::Dusk => "Dusk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Neutral,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub tone: Tone,
    /// Tick at which the notification was raised.
    pub tick: u64,
}

/// A smoke puff drifting up from a chimney or a fire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: ScreenPoint,
    pub velocity: ScreenPoint,
    pub age: f64,
    pub max_age: f64,
    pub size: f64,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.age < self.max_age
    }
}

/// The aggregate root. Every tick produces a new value from the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    pub grid: Grid,
    /// Unclamped; upkeep can drive it negative.
    pub money: i64,
    pub happiness: u32,
    pub tick: u64,
    pub citizens: Vec<Citizen>,
    pub particles: Vec<Particle>,
    pub speed: Speed,
    pub events: Vec<GameEvent>,
    /// Cyclic phase in `[0, 1)`.
    pub day_time: f64,
    pub total_buildings: u64,
    pub total_money_earned: i64,
    pub total_visits: u64,
    pub income_this_tick: i64,
    pub upkeep_this_tick: i64,
    /// Newest first.
    pub notifications: VecDeque<Notification>,
    pub achievements: BTreeSet<Achievement>,
    pub next_citizen_id: u64,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            money: INITIAL_MONEY,
            happiness: INITIAL_HAPPINESS,
            tick: 0,
            citizens: Vec::new(),
            particles: Vec::new(),
            speed: Speed::Normal,
            events: Vec::new(),
            day_time: INITIAL_DAY_TIME,
            total_buildings: 0,
            total_money_earned: 0,
            total_visits: 0,
            income_this_tick: 0,
            upkeep_this_tick: 0,
            notifications: VecDeque::new(),
            achievements: BTreeSet::new(),
            next_citizen_id: 1,
        }
    }

    pub fn with_money(mut self, money: i64) -> Self {
        self.money = money;
        self
    }

    pub fn population(&self) -> usize {
        self.citizens.len()
    }

    /// Net display income of the last tick.
    pub fn income(&self) -> i64 {
        self.income_this_tick - self.upkeep_this_tick
    }

    pub fn day_phase(&self) -> DayPhase {
        DayPhase::from_time(self.day_time)
    }

    pub fn time_of_day(&self) -> &'static str {
        self.day_phase().label()
    }

    pub fn is_paused(&self) -> bool {
        self.speed.is_paused()
    }

    pub fn notify(&mut self, text: impl Into<String>, tone: Tone) {
        self.notifications.push_front(Notification {
            text: text.into(),
            tone,
            tick: self.tick,
        });
        self.notifications.truncate(NOTIFICATION_LIMIT);
    }

    pub fn average_satisfaction(&self) -> Option<f64> {
        if self.citizens.is_empty() {
            return None;
        }
        let sum: f64 = self.citizens.iter().map(|c| c.satisfaction).sum();
        Some(sum / self.citizens.len() as f64)
    }
}
