//! Time-limited city events.
//!
//! Events are spawned stochastically once the city is big enough, live for a
//! fixed number of ticks and fold into the economy and happiness of every tick
//! they are active.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::world::Tone;

pub const MAX_ACTIVE_EVENTS: usize = 2;
/// Non-empty tiles required before any event can spawn.
pub const MIN_BUILDINGS_FOR_EVENTS: usize = 5;
pub const EVENT_CHANCE: f64 = 0.08;
pub const FIRE_DURATION: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Fire,
    Boom,
    Storm,
    Festival,
    PopulationSurge,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Fire => "Fire!",
            EventKind::Boom => "Economic Boom",
            EventKind::Storm => "Storm",
            EventKind::Festival => "Festival!",
            EventKind::PopulationSurge => "Population Surge",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EventKind::Fire => "A building caught fire!",
            EventKind::Boom => "Visitors spending more! +50% revenue",
            EventKind::Storm => "Bad weather! Citizens stay home",
            EventKind::Festival => "Citizens celebrate! More visits",
            EventKind::PopulationSurge => "New residents!",
        }
    }

    pub fn duration(self) -> u32 {
        match self {
            EventKind::Fire => FIRE_DURATION,
            EventKind::Boom => 15,
            EventKind::Storm => 10,
            EventKind::Festival => 12,
            EventKind::PopulationSurge => 10,
        }
    }

    pub fn effect(self) -> EventEffect {
        match self {
            EventKind::Fire => EventEffect::default(),
            EventKind::Boom => EventEffect {
                income_mult: Some(1.5),
                ..EventEffect::default()
            },
            EventKind::Storm => EventEffect {
                happiness_add: Some(-10.0),
                ..EventEffect::default()
            },
            EventKind::Festival => EventEffect {
                happiness_add: Some(12.0),
                ..EventEffect::default()
            },
            EventKind::PopulationSurge => EventEffect {
                pop_add: Some(20),
                ..EventEffect::default()
            },
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            EventKind::Fire | EventKind::Storm => Tone::Danger,
            EventKind::Boom => Tone::Positive,
            EventKind::Festival | EventKind::PopulationSurge => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EventEffect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_mult: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub happiness_add: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pop_add: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    pub label: String,
    pub description: String,
    /// Ticks left, including the current one.
    pub duration: u32,
    pub effect: EventEffect,
}

impl GameEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            description: kind.description().to_string(),
            duration: kind.duration(),
            effect: kind.effect(),
        }
    }

    pub fn headline(&self) -> String {
        format!("{}: {}", self.label, self.description)
    }
}

/// Combined effect of a set of active events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventModifiers {
    pub income_mult: f64,
    pub happiness_add: f64,
    pub pop_add: u32,
}

impl Default for EventModifiers {
    fn default() -> Self {
        Self {
            income_mult: 1.0,
            happiness_add: 0.0,
            pop_add: 0,
        }
    }
}

impl EventModifiers {
    /// Income multipliers compose multiplicatively, the rest additively.
    pub fn fold<'a>(events: impl IntoIterator<Item = &'a GameEvent>) -> Self {
        events
            .into_iter()
            .fold(Self::default(), |mut acc, event| {
                if let Some(mult) = event.effect.income_mult {
                    acc.income_mult *= mult;
                }
                if let Some(delta) = event.effect.happiness_add {
                    acc.happiness_add += delta;
                }
                if let Some(extra) = event.effect.pop_add {
                    acc.pop_add += extra;
                }
                acc
            })
    }
}

/// Counts down every event by one tick and drops the expired ones.
pub fn age_events(events: Vec<GameEvent>) -> Vec<GameEvent> {
    events
        .into_iter()
        .filter_map(|mut event| {
            event.duration = event.duration.saturating_sub(1);
            (event.duration > 0).then_some(event)
        })
        .collect()
}

/// Spawn roll for a new event.
///
/// `non_empty` is the number of built tiles, `active` the number of events
/// that were active when the tick started.
pub fn roll_event<R: Rng + ?Sized>(
    rng: &mut R,
    non_empty: usize,
    active: usize,
    fire_stations: usize,
) -> Option<EventKind> {
    if non_empty < MIN_BUILDINGS_FOR_EVENTS || active >= MAX_ACTIVE_EVENTS {
        return None;
    }
    if rng.gen::<f64>() > EVENT_CHANCE {
        return None;
    }
    Some(pick_kind(rng.gen::<f64>(), non_empty, fire_stations))
}

/// Maps a uniform roll onto the weighted event table. A fire roll in a city
/// with a fire station falls through to a boom.
pub fn pick_kind(roll: f64, non_empty: usize, fire_stations: usize) -> EventKind {
    if roll < 0.2 && fire_stations == 0 && non_empty > 3 {
        EventKind::Fire
    } else if roll < 0.45 {
        EventKind::Boom
    } else if roll < 0.65 {
        EventKind::Storm
    } else if roll < 0.85 {
        EventKind::Festival
    } else {
        EventKind::PopulationSurge
    }
}
