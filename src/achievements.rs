use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::BuildingType;
use crate::world::{Tone, WorldState};

/// Milestones a city can unlock. Unlocks are permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstHouse,
    GrowingTown,
    ThrivingCity,
    Wealthy,
    Tycoon,
    HappyCitizens,
    BusyCity,
    GreenCity,
    Diversified,
    FullGrid,
    Upgrader,
    SafeCity,
}

/// Types a diversified city must contain; roads don't count.
const DIVERSIFIED_TYPES: [BuildingType; 9] = [
    BuildingType::Residential,
    BuildingType::Commercial,
    BuildingType::Industrial,
    BuildingType::Park,
    BuildingType::Power,
    BuildingType::Hospital,
    BuildingType::School,
    BuildingType::FireStation,
    BuildingType::Police,
];

impl Achievement {
    pub const ALL: &'static [Achievement] = &[
        Achievement::FirstHouse,
        Achievement::GrowingTown,
        Achievement::ThrivingCity,
        Achievement::Wealthy,
        Achievement::Tycoon,
        Achievement::HappyCitizens,
        Achievement::BusyCity,
        Achievement::GreenCity,
        Achievement::Diversified,
        Achievement::FullGrid,
        Achievement::Upgrader,
        Achievement::SafeCity,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Achievement::FirstHouse => "first_house",
            Achievement::GrowingTown => "growing_town",
            Achievement::ThrivingCity => "thriving_city",
            Achievement::Wealthy => "wealthy",
            Achievement::Tycoon => "tycoon",
            Achievement::HappyCitizens => "happy_citizens",
            Achievement::BusyCity => "busy_city",
            Achievement::GreenCity => "green_city",
            Achievement::Diversified => "diversified",
            Achievement::FullGrid => "full_grid",
            Achievement::Upgrader => "upgrader",
            Achievement::SafeCity => "safe_city",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Achievement::FirstHouse => "First Home",
            Achievement::GrowingTown => "Growing Town",
            Achievement::ThrivingCity => "Thriving City",
            Achievement::Wealthy => "Wealthy",
            Achievement::Tycoon => "Tycoon",
            Achievement::HappyCitizens => "Happy Citizens",
            Achievement::BusyCity => "Busy City",
            Achievement::GreenCity => "Green City",
            Achievement::Diversified => "Diversified",
            Achievement::FullGrid => "Metropolis",
            Achievement::Upgrader => "Upgrader",
            Achievement::SafeCity => "Safe City",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Achievement::FirstHouse => "Build your first house",
            Achievement::GrowingTown => "Reach 20 citizens",
            Achievement::ThrivingCity => "Reach 60 citizens",
            Achievement::Wealthy => "Accumulate $10,000",
            Achievement::Tycoon => "Earn $50,000 total",
            Achievement::HappyCitizens => "Reach 90% happiness",
            Achievement::BusyCity => "Reach 500 total visits",
            Achievement::GreenCity => "Build 5 parks",
            Achievement::Diversified => "Build one of every type",
            Achievement::FullGrid => "Fill every tile",
            Achievement::Upgrader => "Upgrade any building to level 3",
            Achievement::SafeCity => "Build a fire station and police station",
        }
    }

    /// Pure predicate over the world.
    pub fn is_met(self, world: &WorldState) -> bool {
        let counts = world.grid.counts();
        match self {
            Achievement::FirstHouse => counts.get(BuildingType::Residential) >= 1,
            Achievement::GrowingTown => world.population() >= 20,
            Achievement::ThrivingCity => world.population() >= 60,
            Achievement::Wealthy => world.money >= 10_000,
            Achievement::Tycoon => world.total_money_earned >= 50_000,
            Achievement::HappyCitizens => world.happiness >= 90,
            Achievement::BusyCity => world.total_visits >= 500,
            Achievement::GreenCity => counts.get(BuildingType::Park) >= 5,
            Achievement::Diversified => DIVERSIFIED_TYPES.iter().all(|&ty| counts.get(ty) >= 1),
            Achievement::FullGrid => counts.get(BuildingType::Empty) == 0,
            Achievement::Upgrader => world.grid.tiles().any(|tile| tile.level >= 3),
            Achievement::SafeCity => {
                counts.get(BuildingType::FireStation) >= 1 && counts.get(BuildingType::Police) >= 1
            }
        }
    }
}

/// Unlocks every newly satisfied achievement, raising a notification for each.
/// Returns the achievements unlocked by this call.
pub fn check_achievements(world: &mut WorldState) -> Vec<Achievement> {
    let fresh: Vec<Achievement> = Achievement::ALL
        .iter()
        .copied()
        .filter(|a| !world.achievements.contains(a) && a.is_met(world))
        .collect();
    for &achievement in &fresh {
        world.achievements.insert(achievement);
        world.notify(
            format!("Achievement unlocked: {}", achievement.name()),
            Tone::Positive,
        );
        info!(
            achievement = achievement.id(),
            tick = world.tick,
            "achievement unlocked"
        );
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Tile, TileCoord};

    #[test]
    fn ids_round_trip() {
        for &a in Achievement::ALL {
            assert_eq!(Achievement::from_id(a.id()), Some(a));
            assert_eq!(serde_json::to_value(a).unwrap(), a.id());
        }
        assert_eq!(Achievement::from_id("moon_base"), None);
    }

    #[test]
    fn first_house_unlocks_once() {
        let mut world = WorldState::new();
        assert!(check_achievements(&mut world).is_empty());

        world
            .grid
            .set(TileCoord::new(0, 0), Tile::with_building(BuildingType::Residential));
        assert_eq!(check_achievements(&mut world), vec![Achievement::FirstHouse]);
        assert_eq!(world.notifications.len(), 1);

        assert!(check_achievements(&mut world).is_empty());
        assert_eq!(world.notifications.len(), 1);
    }

    #[test]
    fn unlocks_survive_the_condition_lapsing() {
        let mut world = WorldState::new().with_money(12_000);
        check_achievements(&mut world);
        assert!(world.achievements.contains(&Achievement::Wealthy));
        world.money = 0;
        check_achievements(&mut world);
        assert!(world.achievements.contains(&Achievement::Wealthy));
    }

    #[test]
    fn diversified_ignores_roads() {
        let mut world = WorldState::new();
        for (i, &ty) in DIVERSIFIED_TYPES.iter().enumerate() {
            world.grid.set(TileCoord::new(0, i), Tile::with_building(ty));
        }
        assert!(Achievement::Diversified.is_met(&world));
        assert!(Achievement::SafeCity.is_met(&world));
        assert!(!Achievement::FullGrid.is_met(&world));
    }
}
