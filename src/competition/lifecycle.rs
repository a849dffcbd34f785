//! Competition lifecycle: creation, round scheduling, enrollment, and
//! result entry.
//!
//! Per round the state machine is implicit in the recorded ranks:
//! *not started* (no rank set), *in progress* (some ranks set), *finished*
//! (every player's rank set). Recording a result moves a round forward;
//! clearing a table's results can move it back. Rounds themselves are
//! append-only and capped by the planned round count.

use super::{
    entities::{Competition, Player, Round, RoundResult, Table, SEATS_PER_TABLE},
    errors::{CompetitionError, CompetitionResult},
};

/// State of one round, derived from the recorded ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    NotStarted,
    InProgress,
    Finished,
}

impl Competition {
    /// Create a competition with a fixed player roster and round plan.
    ///
    /// Player serials are assigned 1-based and never reused; names stay
    /// empty until enrollment. `start_time` is epoch seconds and doubles as
    /// the competition's identity in the history list.
    pub fn prepare(
        name: &str,
        player_count: usize,
        round_count: usize,
        start_time: u64,
    ) -> CompetitionResult<Self> {
        if player_count == 0 || player_count % SEATS_PER_TABLE != 0 {
            return Err(CompetitionError::InvalidPlayerCount(player_count));
        }
        if round_count == 0 {
            return Err(CompetitionError::InvalidRoundCount);
        }

        let players = (0..player_count)
            .map(|index| Player {
                serial: index as u32 + 1,
                ..Default::default()
            })
            .collect();

        log::info!(
            "Prepared competition '{name}' with {player_count} players over {round_count} rounds"
        );

        Ok(Self {
            name: name.to_string(),
            players,
            teams: Vec::new(),
            rounds: Vec::new(),
            round_count,
            start_time,
            finish_time: 0,
        })
    }

    /// Name a player during enrollment.
    pub fn enroll_player(&mut self, player_index: usize, name: &str) -> CompetitionResult<()> {
        if name.is_empty() {
            return Err(CompetitionError::EmptyName);
        }
        let player = self
            .players
            .get_mut(player_index)
            .ok_or(CompetitionError::PlayerOutOfRange(player_index))?;
        player.name = name.to_string();
        Ok(())
    }

    /// Enrollment is over once every player has a name.
    pub fn is_enrollment_over(&self) -> bool {
        self.players.iter().all(Player::is_enrolled)
    }

    /// Append the next round: empty tables with sequential serials, and one
    /// default result per player so result sequences stay in lockstep with
    /// the round list.
    ///
    /// Returns the new round's index, or refuses once all planned rounds
    /// have been started.
    pub fn start_new_round(&mut self) -> CompetitionResult<usize> {
        if self.rounds.len() >= self.round_count {
            return Err(CompetitionError::AllRoundsStarted {
                round_count: self.round_count,
            });
        }

        let tables = (0..self.table_count())
            .map(|serial| Table {
                serial: serial as u32,
                ..Default::default()
            })
            .collect();
        self.rounds.push(Round { tables });

        for player in &mut self.players {
            player.results.push(RoundResult::default());
        }

        let round = self.rounds.len() - 1;
        log::info!("Competition '{}': started round {round}", self.name);
        Ok(round)
    }

    /// Whether any result has been recorded for `round`.
    pub fn is_round_started(&self, round: usize) -> bool {
        round < self.rounds.len() && self.recorded_count(round) > 0
    }

    /// Whether every player's result for `round` has been recorded.
    pub fn is_round_finished(&self, round: usize) -> bool {
        round < self.rounds.len() && self.recorded_count(round) == self.players.len()
    }

    /// Derived state of `round`.
    pub fn round_phase(&self, round: usize) -> RoundPhase {
        match self.recorded_count(round) {
            0 => RoundPhase::NotStarted,
            n if n == self.players.len() => RoundPhase::Finished,
            _ => RoundPhase::InProgress,
        }
    }

    /// Record one player's result for one round.
    ///
    /// Rank 0 un-records the result. Ranks above 4 are refused outright;
    /// range validation is otherwise the presentation layer's contract, but
    /// a damaged caller must not be able to poison the rank histogram.
    pub fn record_result(
        &mut self,
        round: usize,
        player_index: usize,
        result: RoundResult,
    ) -> CompetitionResult<()> {
        self.check_round(round)?;
        if result.rank as usize > SEATS_PER_TABLE {
            return Err(CompetitionError::InvalidRank(result.rank));
        }
        let player = self
            .players
            .get_mut(player_index)
            .ok_or(CompetitionError::PlayerOutOfRange(player_index))?;
        player.results[round] = result;
        Ok(())
    }

    /// Reset every seated player's result for one table back to unrecorded.
    ///
    /// This is the only rollback: it can move a finished round back to in
    /// progress, or an in-progress round back to not started.
    pub fn clear_table_results(&mut self, round: usize, table_index: usize) -> CompetitionResult<()> {
        self.check_round(round)?;
        let table = self.rounds[round]
            .tables
            .get(table_index)
            .ok_or(CompetitionError::TableOutOfRange(table_index))?;
        let seated: Vec<usize> = table.occupied_seats().collect();
        for player_index in seated {
            self.players[player_index].results[round] = RoundResult::default();
        }
        log::debug!(
            "Competition '{}': cleared results of round {round} table {table_index}",
            self.name
        );
        Ok(())
    }

    /// Manually place a player on a seat.
    ///
    /// Used by interactive seating; the engine only enforces that seats
    /// cannot change once the round has started and that a player occupies
    /// at most one seat across the round's tables.
    pub fn seat_player(
        &mut self,
        round: usize,
        table_index: usize,
        seat: usize,
        player_index: usize,
    ) -> CompetitionResult<()> {
        self.check_round(round)?;
        if self.is_round_started(round) {
            return Err(CompetitionError::RoundAlreadyStarted(round));
        }
        if seat >= SEATS_PER_TABLE {
            return Err(CompetitionError::SeatOutOfRange(seat));
        }
        if player_index >= self.players.len() {
            return Err(CompetitionError::PlayerOutOfRange(player_index));
        }
        let already_seated = self.rounds[round]
            .tables
            .iter()
            .flat_map(Table::occupied_seats)
            .any(|seated| seated == player_index);
        if already_seated {
            return Err(CompetitionError::PlayerAlreadySeated {
                serial: self.players[player_index].serial,
            });
        }
        let table = self.rounds[round]
            .tables
            .get_mut(table_index)
            .ok_or(CompetitionError::TableOutOfRange(table_index))?;
        table.seats[seat] = Some(player_index);
        Ok(())
    }

    /// Empty a seat again while the round has not started.
    pub fn clear_seat(
        &mut self,
        round: usize,
        table_index: usize,
        seat: usize,
    ) -> CompetitionResult<()> {
        self.check_round(round)?;
        if self.is_round_started(round) {
            return Err(CompetitionError::RoundAlreadyStarted(round));
        }
        if seat >= SEATS_PER_TABLE {
            return Err(CompetitionError::SeatOutOfRange(seat));
        }
        let table = self.rounds[round]
            .tables
            .get_mut(table_index)
            .ok_or(CompetitionError::TableOutOfRange(table_index))?;
        table.seats[seat] = None;
        Ok(())
    }

    /// Stamp the finish time, closing the competition.
    pub fn finish(&mut self, finish_time: u64) {
        self.finish_time = finish_time;
        log::info!("Competition '{}' finished", self.name);
    }

    pub(crate) fn check_round(&self, round: usize) -> CompetitionResult<()> {
        if round < self.rounds.len() {
            Ok(())
        } else {
            Err(CompetitionError::RoundOutOfRange {
                round,
                started: self.rounds.len(),
            })
        }
    }

    fn recorded_count(&self, round: usize) -> usize {
        self.players
            .iter()
            .filter(|player| {
                player
                    .results
                    .get(round)
                    .is_some_and(RoundResult::is_recorded)
            })
            .count()
    }
}
