//! Citizen agents.
//!
//! A citizen carries five needs that grow every tick and a small state machine
//! (`Idle -> Walking -> Visiting -> Returning -> Idle`) that greedily sends it to
//! whatever building satisfies its most pressing need. Movement itself happens
//! in [`crate::animation`]; this module only decides where to go.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{BuildingType, Need};
use crate::grid::{Grid, TileCoord};
use crate::projection::{self, ScreenPoint, ARRIVAL_EPSILON, HALF_HEIGHT, HALF_WIDTH};

/// Needs below this value are not worth leaving home for.
pub const NEED_THRESHOLD: f64 = 40.0;
pub const NEED_MAX: f64 = 100.0;
pub const SATISFACTION_MAX: f64 = 100.0;

pub const NO_DESTINATION_PENALTY: f64 = 2.0;
pub const TURNED_AWAY_PENALTY: f64 = 5.0;
pub const VISIT_SATISFACTION_BONUS: f64 = 8.0;

const WANDER_CHANCE: f64 = 0.3;
const STARTING_SATISFACTION: f64 = 70.0;
const STARTING_WALLET: i64 = 50;

pub const CITIZEN_PALETTE: [&str; 10] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#e67e22", "#e84393",
    "#00b894", "#fdcb6e",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitizenState {
    Idle,
    Walking,
    Visiting,
    Returning,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub shopping: f64,
    pub entertainment: f64,
    pub work: f64,
    pub health: f64,
    pub education: f64,
}

impl Needs {
    pub fn get(&self, need: Need) -> f64 {
        match need {
            Need::Shopping => self.shopping,
            Need::Entertainment => self.entertainment,
            Need::Work => self.work,
            Need::Health => self.health,
            Need::Education => self.education,
        }
    }

    /// Stores `value` clamped to `0..=100`.
    pub fn set(&mut self, need: Need, value: f64) {
        let value = value.clamp(0.0, NEED_MAX);
        match need {
            Need::Shopping => self.shopping = value,
            Need::Entertainment => self.entertainment = value,
            Need::Work => self.work = value,
            Need::Health => self.health = value,
            Need::Education => self.education = value,
        }
    }

    /// Per-tick growth: a fixed baseline plus bounded jitter, saturating at 100.
    pub fn grow<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for need in Need::ALL {
            let (baseline, jitter) = growth_rate(need);
            let next = self.get(need) + baseline + rng.gen::<f64>() * jitter;
            self.set(need, next);
        }
    }

    /// Most pressing need; ties resolve to the earlier need in [`Need::ALL`].
    pub fn highest(&self) -> (Need, f64) {
        let mut best = (Need::Shopping, 0.0);
        for need in Need::ALL {
            let value = self.get(need);
            if value > best.1 {
                best = (need, value);
            }
        }
        best
    }

    pub fn fulfil(&mut self, need: Need, amount: f64) {
        self.set(need, self.get(need) - amount);
    }
}

fn growth_rate(need: Need) -> (f64, f64) {
    match need {
        Need::Shopping => (2.0, 1.5),
        Need::Entertainment => (1.5, 1.0),
        Need::Work => (2.5, 1.0),
        Need::Health => (0.3, 0.3),
        Need::Education => (0.8, 0.5),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citizen {
    pub id: u64,
    pub position: ScreenPoint,
    pub target: ScreenPoint,
    /// Index into [`CITIZEN_PALETTE`].
    pub color: u8,
    pub speed: f64,
    pub state: CitizenState,
    pub home: TileCoord,
    pub target_tile: Option<TileCoord>,
    /// Building type of `target_tile` when the trip was chosen.
    pub target_type: Option<BuildingType>,
    pub needs: Needs,
    pub satisfaction: f64,
    pub visit_timer: u32,
    pub wallet: i64,
}

/// What an idle citizen did with its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleOutcome {
    Rested,
    Wandered,
    NoDestination(Need),
    Departed(TileCoord),
}

impl Citizen {
    pub fn spawn<R: Rng + ?Sized>(id: u64, home: TileCoord, rng: &mut R) -> Self {
        let corner = projection::grid_to_screen(home);
        let position = ScreenPoint::new(
            corner.x + (rng.gen::<f64>() - 0.5) * HALF_WIDTH * 0.6,
            corner.y + HALF_HEIGHT + (rng.gen::<f64>() - 0.5) * HALF_HEIGHT * 0.4,
        );
        let color = rng.gen_range(0..CITIZEN_PALETTE.len()) as u8;
        let speed = 0.3 + rng.gen::<f64>() * 0.4;
        let needs = Needs {
            shopping: 20.0 + rng.gen::<f64>() * 30.0,
            entertainment: 10.0 + rng.gen::<f64>() * 20.0,
            work: 30.0 + rng.gen::<f64>() * 20.0,
            health: 0.0,
            education: 5.0 + rng.gen::<f64>() * 15.0,
        };
        Self {
            id,
            position,
            target: projection::tile_anchor(home),
            color,
            speed,
            state: CitizenState::Idle,
            home,
            target_tile: None,
            target_type: None,
            needs,
            satisfaction: STARTING_SATISFACTION,
            visit_timer: 0,
            wallet: STARTING_WALLET,
        }
    }

    pub fn color_hex(&self) -> &'static str {
        CITIZEN_PALETTE
            .get(self.color as usize)
            .copied()
            .unwrap_or(CITIZEN_PALETTE[0])
    }

    pub fn has_arrived(&self) -> bool {
        self.position.distance_to(self.target) < ARRIVAL_EPSILON
    }

    pub fn adjust_satisfaction(&mut self, delta: f64) {
        self.satisfaction = (self.satisfaction + delta).clamp(0.0, SATISFACTION_MAX);
    }

    /// The need the current trip is meant to satisfy.
    pub fn trip_need(&self) -> Option<Need> {
        self.target_type.and_then(|ty| ty.info().need_fulfilled)
    }

    /// Drops the current destination and walks back to a point near home.
    pub fn head_home<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state = CitizenState::Returning;
        self.target = projection::random_near_tile(self.home, rng);
        self.target_tile = None;
        self.target_type = None;
        self.visit_timer = 0;
    }

    /// Idle decision: pick a destination for the most pressing need, wander,
    /// or lose satisfaction when nothing can serve the need.
    pub fn decide<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) -> IdleOutcome {
        let (need, value) = self.needs.highest();
        if value < NEED_THRESHOLD {
            if rng.gen::<f64>() < WANDER_CHANCE {
                self.target = projection::random_near_tile(self.home, rng);
                return IdleOutcome::Wandered;
            }
            return IdleOutcome::Rested;
        }

        let Some(destination) = find_building_for_need(grid, need, rng) else {
            self.adjust_satisfaction(-NO_DESTINATION_PENALTY);
            return IdleOutcome::NoDestination(need);
        };

        self.state = CitizenState::Walking;
        self.target_tile = Some(destination);
        self.target_type = grid.building_at(destination);
        self.target = projection::random_near_tile(destination, rng);
        IdleOutcome::Departed(destination)
    }
}

/// Uniformly picks a tile that fulfils `need` and still has room.
pub fn find_building_for_need<R: Rng + ?Sized>(
    grid: &Grid,
    need: Need,
    rng: &mut R,
) -> Option<TileCoord> {
    let candidates: Vec<TileCoord> = grid
        .iter()
        .filter(|(_, tile)| {
            !tile.is_empty() && tile.info().need_fulfilled == Some(need) && tile.has_room()
        })
        .map(|(coord, _)| coord)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    fn calm_needs() -> Needs {
        Needs {
            shopping: 10.0,
            entertainment: 10.0,
            work: 10.0,
            health: 0.0,
            education: 5.0,
        }
    }

    #[test]
    fn spawned_citizen_starts_idle_at_home() {
        let mut rng = rng();
        let citizen = Citizen::spawn(7, TileCoord::new(2, 3), &mut rng);
        assert_eq!(citizen.id, 7);
        assert_eq!(citizen.state, CitizenState::Idle);
        assert_eq!(citizen.home, TileCoord::new(2, 3));
        assert_eq!(citizen.satisfaction, 70.0);
        assert!((0.3..0.7).contains(&citizen.speed));
        assert!((20.0..50.0).contains(&citizen.needs.shopping));
        assert_eq!(citizen.needs.health, 0.0);
    }

    #[test]
    fn needs_grow_and_saturate() {
        let mut rng = rng();
        let mut needs = Needs {
            shopping: 99.5,
            ..calm_needs()
        };
        needs.grow(&mut rng);
        assert_eq!(needs.shopping, 100.0);
        assert!(needs.work >= 12.5 && needs.work < 13.5);
        assert!(needs.health >= 0.3 && needs.health < 0.6);
    }

    #[test]
    fn highest_prefers_first_on_ties() {
        let needs = Needs {
            shopping: 50.0,
            entertainment: 50.0,
            work: 20.0,
            health: 0.0,
            education: 0.0,
        };
        assert_eq!(needs.highest(), (Need::Shopping, 50.0));
    }

    #[test]
    fn fulfil_floors_at_zero() {
        let mut needs = calm_needs();
        needs.fulfil(Need::Work, 80.0);
        assert_eq!(needs.work, 0.0);
    }

    #[test]
    fn calm_citizen_stays_idle() {
        let mut rng = rng();
        let grid = Grid::new();
        let mut citizen = Citizen::spawn(1, TileCoord::new(0, 0), &mut rng);
        citizen.needs = calm_needs();
        for _ in 0..20 {
            let outcome = citizen.decide(&grid, &mut rng);
            assert!(matches!(outcome, IdleOutcome::Rested | IdleOutcome::Wandered));
            assert_eq!(citizen.state, CitizenState::Idle);
        }
    }

    #[test]
    fn pressing_need_without_building_costs_satisfaction() {
        let mut rng = rng();
        let grid = Grid::new();
        let mut citizen = Citizen::spawn(1, TileCoord::new(0, 0), &mut rng);
        citizen.needs = Needs {
            work: 75.0,
            ..calm_needs()
        };
        let outcome = citizen.decide(&grid, &mut rng);
        assert_eq!(outcome, IdleOutcome::NoDestination(Need::Work));
        assert_eq!(citizen.satisfaction, 70.0 - NO_DESTINATION_PENALTY);
        assert_eq!(citizen.state, CitizenState::Idle);
    }

    #[test]
    fn pressing_need_sends_citizen_walking() {
        let mut rng = rng();
        let mut grid = Grid::new();
        let factory = TileCoord::new(4, 4);
        grid.set(factory, Tile::with_building(BuildingType::Industrial));
        let mut citizen = Citizen::spawn(1, TileCoord::new(0, 0), &mut rng);
        citizen.needs = Needs {
            work: 75.0,
            ..calm_needs()
        };
        assert_eq!(citizen.decide(&grid, &mut rng), IdleOutcome::Departed(factory));
        assert_eq!(citizen.state, CitizenState::Walking);
        assert_eq!(citizen.target_tile, Some(factory));
        assert_eq!(citizen.target_type, Some(BuildingType::Industrial));
        assert_eq!(citizen.trip_need(), Some(Need::Work));
    }

    #[test]
    fn full_buildings_are_not_candidates() {
        let mut rng = rng();
        let mut grid = Grid::new();
        let shop = TileCoord::new(1, 1);
        let mut tile = Tile::with_building(BuildingType::Commercial);
        tile.visitor_count = 6;
        grid.set(shop, tile);
        assert_eq!(find_building_for_need(&grid, Need::Shopping, &mut rng), None);

        grid.get_mut(shop).unwrap().visitor_count = 5;
        assert_eq!(
            find_building_for_need(&grid, Need::Shopping, &mut rng),
            Some(shop)
        );
    }

    #[test]
    fn heading_home_clears_destination() {
        let mut rng = rng();
        let mut citizen = Citizen::spawn(1, TileCoord::new(3, 3), &mut rng);
        citizen.state = CitizenState::Visiting;
        citizen.target_tile = Some(TileCoord::new(5, 5));
        citizen.target_type = Some(BuildingType::Park);
        citizen.head_home(&mut rng);
        assert_eq!(citizen.state, CitizenState::Returning);
        assert_eq!(citizen.target_tile, None);
        assert_eq!(citizen.target_type, None);
    }
}
