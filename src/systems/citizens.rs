use anyhow::Result;
use rand::Rng;
use tracing::{debug, trace};

use crate::{
    catalog::level_multiplier,
    citizen::{
        Citizen, CitizenState, IdleOutcome, TURNED_AWAY_PENALTY, VISIT_SATISFACTION_BONUS,
    },
    engine::{System, SystemContext},
    grid::{Grid, Tile},
    rng::SystemRng,
    world::WorldState,
};

/// Runs the citizen state machine for one tick.
///
/// Visitor counts are a census: every tile starts the tick at zero, then each
/// citizen already inside a building re-asserts its place before anyone acts.
/// A visitor whose building shrank below the head count or no longer serves
/// the trip's need is sent home.
pub struct CitizenSystem;

impl CitizenSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CitizenSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct TickTally {
    revenue: i64,
    visits: u64,
    departures: usize,
    turned_away: usize,
    evicted: usize,
}

impl System for CitizenSystem {
    fn name(&self) -> &str {
        "citizens"
    }

    fn run(
        &mut self,
        ctx: &mut SystemContext<'_>,
        world: &mut WorldState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let WorldState { grid, citizens, .. } = world;
        let mut tally = TickTally::default();

        for tile in grid.tiles_mut() {
            tile.visitor_count = 0;
            tile.revenue_this_tick = 0;
        }

        for citizen in citizens
            .iter_mut()
            .filter(|c| c.state == CitizenState::Visiting)
        {
            match visit_slot(grid, citizen) {
                Some(tile) if tile.has_room() => tile.visitor_count += 1,
                _ => {
                    turn_back(citizen, rng);
                    tally.evicted += 1;
                }
            }
        }

        for citizen in citizens.iter_mut() {
            citizen.needs.grow(rng);
            match citizen.state {
                CitizenState::Idle => {
                    if let IdleOutcome::Departed(_) = citizen.decide(grid, rng) {
                        tally.departures += 1;
                    }
                }
                CitizenState::Walking => {
                    if citizen.has_arrived() {
                        arrive(grid, citizen, rng, &mut tally);
                    }
                }
                CitizenState::Visiting => {
                    citizen.visit_timer = citizen.visit_timer.saturating_sub(1);
                    if citizen.visit_timer == 0 {
                        complete_visit(grid, citizen, &mut tally);
                        citizen.head_home(rng);
                    }
                }
                CitizenState::Returning => {
                    if citizen.has_arrived() {
                        citizen.state = CitizenState::Idle;
                    }
                }
            }
        }

        ctx.ledger.visit_revenue += tally.revenue;
        ctx.ledger.visits += tally.visits;
        debug!(
            tick = ctx.tick,
            revenue = tally.revenue,
            visits = tally.visits,
            departures = tally.departures,
            turned_away = tally.turned_away,
            evicted = tally.evicted,
            "citizens ticked"
        );
        Ok(())
    }
}

/// The target tile, if it still serves the need the trip was started for.
fn visit_slot<'g>(grid: &'g mut Grid, citizen: &Citizen) -> Option<&'g mut Tile> {
    let need = citizen.trip_need()?;
    let tile = grid.get_mut(citizen.target_tile?)?;
    (tile.info().need_fulfilled == Some(need)).then_some(tile)
}

fn turn_back<R: Rng + ?Sized>(citizen: &mut Citizen, rng: &mut R) {
    citizen.head_home(rng);
    citizen.adjust_satisfaction(-TURNED_AWAY_PENALTY);
}

fn arrive<R: Rng + ?Sized>(
    grid: &mut Grid,
    citizen: &mut Citizen,
    rng: &mut R,
    tally: &mut TickTally,
) {
    match visit_slot(grid, citizen) {
        Some(tile) if tile.has_room() => {
            tile.visitor_count += 1;
            citizen.state = CitizenState::Visiting;
            citizen.visit_timer = tile.info().visit_duration;
        }
        _ => {
            trace!(citizen = citizen.id, "destination full or changed");
            turn_back(citizen, rng);
            tally.turned_away += 1;
        }
    }
}

fn complete_visit(grid: &mut Grid, citizen: &mut Citizen, tally: &mut TickTally) {
    let Some(tile) = visit_slot(grid, citizen) else {
        return;
    };
    let info = tile.info();
    let mult = level_multiplier(tile.level);
    let revenue = (info.revenue_per_visit * mult).round() as i64;
    tile.revenue_this_tick += revenue;
    tile.total_visits += 1;
    if let Some(need) = info.need_fulfilled {
        citizen.needs.fulfil(need, info.fulfill_amount * mult);
    }
    citizen.adjust_satisfaction(VISIT_SATISFACTION_BONUS);
    tally.revenue += revenue;
    tally.visits += 1;
}
