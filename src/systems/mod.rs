mod bookkeeping;
mod citizens;
mod day_night;
mod economy;
mod effects;
mod events;
mod fire;
mod happiness;
mod population;

pub use bookkeeping::BookkeepingSystem;
pub use citizens::CitizenSystem;
pub use day_night::{advance_day_time, DayNightSystem, DAY_LENGTH_TICKS};
pub use economy::{calculate_upkeep, school_bonus, EconomySystem};
pub use effects::{spawn_smoke, EffectsSystem};
pub use events::{ignite_random_building, EventSystem};
pub use fire::{tick_fire_timers, FireSystem};
pub use happiness::{calculate_happiness, HappinessSystem};
pub use population::{population_capacity, PopulationSystem};
