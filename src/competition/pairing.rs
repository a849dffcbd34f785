//! Seat assignment: four interchangeable pairing strategies.
//!
//! Each strategy produces a full table plan for one round without touching
//! the aggregate; [`Competition::assign_seats`] installs the plan, refusing
//! once scoring has begun. The strategies form a closed set, dispatched
//! through [`PairingStrategy`] via `enum_dispatch`.

use enum_dispatch::enum_dispatch;
use rand::seq::SliceRandom;

use super::{
    entities::{Competition, SEATS_PER_TABLE, Table},
    errors::{CompetitionError, CompetitionResult},
    ranking::rank_players,
};

/// A pairing strategy: partition all players into four-seat tables for one
/// round.
#[enum_dispatch]
pub trait PlanSeats {
    /// Build the table plan for `round`. Pure with respect to the
    /// competition; the round's prior results (rounds `0..round`) are the
    /// only input the score-based strategies consult.
    fn plan(&self, competition: &Competition, round: usize) -> Vec<Table>;
}

/// Consecutive groups of four in ascending serial order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerialPairing;

impl PlanSeats for SerialPairing {
    fn plan(&self, competition: &Competition, _round: usize) -> Vec<Table> {
        let mut order: Vec<usize> = (0..competition.players.len()).collect();
        order.sort_by_key(|&index| competition.players[index].serial);
        tables_from_order(&order)
    }
}

/// Uniform shuffle, then consecutive groups of four.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RandomPairing;

impl PlanSeats for RandomPairing {
    fn plan(&self, competition: &Competition, _round: usize) -> Vec<Table> {
        let mut order: Vec<usize> = (0..competition.players.len()).collect();
        order.shuffle(&mut rand::rng());
        tables_from_order(&order)
    }
}

/// "High carries high": rank over the prior rounds, then seat the top four
/// together, the next four together, and so on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScorePairing;

impl PlanSeats for ScorePairing {
    fn plan(&self, competition: &Competition, round: usize) -> Vec<Table> {
        tables_from_order(&rank_players(competition, round))
    }
}

/// Boustrophedon seeding: stride inward from both ends of the ranking so
/// table strength is balanced rather than stacked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnakePairing;

impl PlanSeats for SnakePairing {
    fn plan(&self, competition: &Competition, round: usize) -> Vec<Table> {
        let ranked = rank_players(competition, round);
        let count = ranked.len();
        if count == 0 {
            return Vec::new();
        }

        // Four cursors: two walking in from the ends, two out from the
        // middle. Table i seats ranked[east], ranked[south], ranked[west],
        // ranked[north].
        let mut east = 0;
        let mut south = count / 2 - 1;
        let mut west = count / 2;
        let mut north = count - 1;

        let mut tables = Vec::with_capacity(count / SEATS_PER_TABLE);
        for serial in 0..count / SEATS_PER_TABLE {
            tables.push(Table {
                serial: serial as u32,
                seats: [
                    Some(ranked[east]),
                    Some(ranked[south]),
                    Some(ranked[west]),
                    Some(ranked[north]),
                ],
            });
            east += 1;
            south = south.saturating_sub(1);
            west += 1;
            north -= 1;
        }
        tables
    }
}

/// The closed set of pairing strategies.
#[enum_dispatch(PlanSeats)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairingStrategy {
    SerialPairing,
    RandomPairing,
    ScorePairing,
    SnakePairing,
}

impl Default for PairingStrategy {
    fn default() -> Self {
        SerialPairing.into()
    }
}

impl Competition {
    /// Install a strategy's table plan for `round`.
    ///
    /// Refuses without mutating once any result for the round has been
    /// recorded: reseating would orphan table-scoped results.
    pub fn assign_seats(
        &mut self,
        round: usize,
        strategy: &PairingStrategy,
    ) -> CompetitionResult<()> {
        self.check_round(round)?;
        if self.is_round_started(round) {
            return Err(CompetitionError::RoundAlreadyStarted(round));
        }

        let tables = strategy.plan(self, round);
        debug_assert_eq!(tables.len(), self.table_count());
        self.rounds[round].tables = tables;

        log::debug!(
            "Competition '{}': assigned seats for round {round} using {strategy:?}",
            self.name
        );
        Ok(())
    }
}

fn tables_from_order(order: &[usize]) -> Vec<Table> {
    order
        .chunks_exact(SEATS_PER_TABLE)
        .enumerate()
        .map(|(serial, chunk)| Table {
            serial: serial as u32,
            seats: [Some(chunk[0]), Some(chunk[1]), Some(chunk[2]), Some(chunk[3])],
        })
        .collect()
}
