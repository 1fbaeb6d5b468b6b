//! Player actions on the grid.
//!
//! Actions never mutate their input: they return the next [`WorldState`] or
//! [`Rejected`], which carries no reason. Callers that want to explain a
//! rejection re-derive it with [`diagnose_placement`] / [`diagnose_upgrade`].

use serde::Serialize;
use tracing::debug;

use crate::catalog::{self, level_multiplier, BuildingType, Need, MAX_LEVEL};
use crate::grid::{Tile, TileCoord};
use crate::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("action rejected")]
pub struct Rejected;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("tile ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("tile is already occupied")]
    Occupied,
    #[error("nothing to demolish")]
    NothingToDemolish,
    #[error("not enough money: need ${needed}, have ${available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("this building cannot be upgraded")]
    NotUpgradable,
    #[error("already at max level")]
    MaxLevel,
}

/// Places `building_type` at `coord`, or demolishes when it is
/// [`BuildingType::Empty`].
pub fn place_building(
    world: &WorldState,
    coord: TileCoord,
    building_type: BuildingType,
) -> Result<WorldState, Rejected> {
    if diagnose_placement(world, coord, building_type).is_some() {
        return Err(Rejected);
    }
    let current = world.grid.building_at(coord).ok_or(Rejected)?;
    let mut next = world.clone();

    if building_type.is_empty() {
        let refund = current.info().demolition_refund();
        next.grid.set(coord, Tile::empty());
        next.money += refund;
        debug!(?coord, demolished = current.id(), refund, "building demolished");
    } else {
        let cost = building_type.info().cost;
        next.grid.set(coord, Tile::with_building(building_type));
        next.money -= cost;
        debug!(?coord, building = building_type.id(), cost, "building placed");
    }
    Ok(next)
}

/// Raises the building at `coord` by one level.
pub fn upgrade_building(world: &WorldState, coord: TileCoord) -> Result<WorldState, Rejected> {
    if diagnose_upgrade(world, coord).is_some() {
        return Err(Rejected);
    }
    let tile = world.grid.get(coord).ok_or(Rejected)?;
    let cost = catalog::upgrade_cost(tile.building_type, tile.level).ok_or(Rejected)?;

    let mut next = world.clone();
    let slot = next.grid.get_mut(coord).ok_or(Rejected)?;
    slot.level += 1;
    let level = slot.level;
    next.money -= cost;
    debug!(?coord, level, cost, "building upgraded");
    Ok(next)
}

/// Why [`place_building`] would reject, or `None` if it would succeed.
pub fn diagnose_placement(
    world: &WorldState,
    coord: TileCoord,
    building_type: BuildingType,
) -> Option<RejectionReason> {
    let Some(tile) = world.grid.get(coord) else {
        return Some(RejectionReason::OutOfBounds {
            row: coord.row,
            col: coord.col,
        });
    };
    if building_type.is_empty() {
        return tile.is_empty().then_some(RejectionReason::NothingToDemolish);
    }
    if !tile.is_empty() {
        return Some(RejectionReason::Occupied);
    }
    let cost = building_type.info().cost;
    (world.money < cost).then_some(RejectionReason::InsufficientFunds {
        needed: cost,
        available: world.money,
    })
}

/// Why [`upgrade_building`] would reject, or `None` if it would succeed.
pub fn diagnose_upgrade(world: &WorldState, coord: TileCoord) -> Option<RejectionReason> {
    let Some(tile) = world.grid.get(coord) else {
        return Some(RejectionReason::OutOfBounds {
            row: coord.row,
            col: coord.col,
        });
    };
    if tile.is_empty() || tile.info().upgrade_cost_mult == 0.0 {
        return Some(RejectionReason::NotUpgradable);
    }
    if tile.level >= MAX_LEVEL {
        return Some(RejectionReason::MaxLevel);
    }
    let cost = catalog::upgrade_cost(tile.building_type, tile.level)?;
    (world.money < cost).then_some(RejectionReason::InsufficientFunds {
        needed: cost,
        available: world.money,
    })
}

/// Level-scaled view of one building, as shown in an inspector panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingStats {
    pub building_type: BuildingType,
    pub revenue_per_visit: i64,
    pub upkeep: i64,
    pub capacity: u32,
    pub visitors: u32,
    pub total_visits: u64,
    pub happiness_effect: i64,
    pub level: u8,
    /// `None` when the building cannot be upgraded further.
    pub upgrade_cost: Option<i64>,
    pub need_fulfilled: Option<Need>,
}

pub fn building_stats(world: &WorldState, coord: TileCoord) -> Option<BuildingStats> {
    let tile = world.grid.get(coord).filter(|tile| !tile.is_empty())?;
    let info = tile.info();
    let mult = level_multiplier(tile.level);
    Some(BuildingStats {
        building_type: tile.building_type,
        revenue_per_visit: (info.revenue_per_visit * mult).round() as i64,
        upkeep: (info.upkeep_per_tick * mult).round() as i64,
        capacity: tile.effective_capacity(),
        visitors: tile.visitor_count,
        total_visits: tile.total_visits,
        happiness_effect: (info.happiness_effect * mult).round() as i64,
        level: tile.level,
        upgrade_cost: catalog::upgrade_cost(tile.building_type, tile.level),
        need_fulfilled: info.need_fulfilled,
    })
}
