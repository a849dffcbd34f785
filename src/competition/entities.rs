//! Competition entities: results, players, teams, tables, and rounds.
//!
//! These are plain data records. All cross-references between entities are
//! index-based weak references into the owning [`Competition`]'s sequences,
//! never pointers, so nothing dangles when the aggregate moves. Documents
//! decode leniently: a missing or type-mismatched field falls back to the
//! field's default, and [`Competition::normalize`] repairs any index that
//! points outside the aggregate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Number of seats at a single table.
pub const SEATS_PER_TABLE: usize = 4;

/// Sentinel written to disk for an empty seat or a missing team.
const NO_INDEX: i64 = -1;

/// One player's outcome for one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Finishing position at the table, 1-4. Zero means "not recorded yet".
    #[serde(default, deserialize_with = "de::lenient")]
    pub rank: u8,

    /// Normalized score used for ranking.
    #[serde(default, deserialize_with = "de::lenient")]
    pub standard_score: f64,

    /// Raw game points, signed.
    #[serde(default, deserialize_with = "de::lenient")]
    pub competition_score: i64,
}

impl RoundResult {
    /// Create a recorded result.
    pub fn new(rank: u8, standard_score: f64, competition_score: i64) -> Self {
        Self {
            rank,
            standard_score,
            competition_score,
        }
    }

    /// A round is recorded for a player iff its rank is set.
    pub fn is_recorded(&self) -> bool {
        self.rank != 0
    }
}

/// A competition participant.
///
/// Identity is the `serial`, assigned once at competition creation and never
/// reused. Other structures refer to players by index into
/// [`Competition::players`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identity, assigned at competition creation.
    #[serde(default, deserialize_with = "de::lenient")]
    pub serial: u32,

    /// Display name; empty until the player is enrolled.
    #[serde(default, deserialize_with = "de::lenient")]
    pub name: String,

    /// One result per started round; index = round number.
    #[serde(
        default,
        rename = "competition_results",
        deserialize_with = "de::lenient"
    )]
    pub results: Vec<RoundResult>,

    /// Index into the competition's team list, if the player belongs to one.
    #[serde(default, rename = "team_index", with = "de::opt_index")]
    pub team: Option<usize>,
}

impl Player {
    /// Whether the player has been named during enrollment.
    pub fn is_enrolled(&self) -> bool {
        !self.name.is_empty()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "#{}", self.serial)
        } else {
            write!(f, "#{} {}", self.serial, self.name)
        }
    }
}

/// Optional grouping of players; not consulted by the pairing strategies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, deserialize_with = "de::lenient")]
    pub serial: u32,

    #[serde(default, deserialize_with = "de::lenient")]
    pub name: String,

    /// Weak references into [`Competition::players`].
    #[serde(default, deserialize_with = "de::lenient")]
    pub player_indices: Vec<usize>,
}

/// One physical seating unit for one round: four seats, each holding a
/// player index or nothing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Position within the round, 0-based.
    #[serde(default, deserialize_with = "de::lenient")]
    pub serial: u32,

    /// Seats east/south/west/north. Empty seats encode as -1 on the wire.
    #[serde(default, rename = "player_indices", with = "de::seat_indices")]
    pub seats: [Option<usize>; SEATS_PER_TABLE],
}

impl Table {
    /// A table is complete when all four seats are filled.
    pub fn is_complete(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    /// Iterate the occupied seats as player indices.
    pub fn occupied_seats(&self) -> impl Iterator<Item = usize> + '_ {
        self.seats.iter().filter_map(|seat| *seat)
    }
}

/// One full cycle of play across all tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    #[serde(default, deserialize_with = "de::lenient")]
    pub tables: Vec<Table>,
}

/// The root aggregate: sole owner of all player, team, round, and table
/// data. Rounds are append-only; the player list is fixed after creation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    #[serde(default, deserialize_with = "de::lenient")]
    pub name: String,

    #[serde(default, deserialize_with = "de::lenient")]
    pub players: Vec<Player>,

    #[serde(default, deserialize_with = "de::lenient")]
    pub teams: Vec<Team>,

    #[serde(default, deserialize_with = "de::lenient")]
    pub rounds: Vec<Round>,

    /// Planned total number of rounds, fixed at creation.
    #[serde(default, deserialize_with = "de::lenient")]
    pub round_count: usize,

    /// Epoch seconds; identity key for the history list.
    #[serde(default, deserialize_with = "de::lenient")]
    pub start_time: u64,

    /// Epoch seconds; zero while the competition is still open.
    #[serde(default, deserialize_with = "de::lenient")]
    pub finish_time: u64,
}

impl Competition {
    /// Number of tables per round.
    pub fn table_count(&self) -> usize {
        self.players.len() / SEATS_PER_TABLE
    }

    /// Whether the surrounding application has closed this competition.
    pub fn is_finished(&self) -> bool {
        self.finish_time != 0
    }

    /// Repair a freshly decoded aggregate.
    ///
    /// Older or damaged documents may carry indices that no longer resolve.
    /// Seat and team references outside the aggregate become empty, a player
    /// appearing twice within one round keeps only its first seat, and every
    /// player's result sequence is grown to match the round count so score
    /// lookups by round number never go out of bounds.
    pub fn normalize(&mut self) {
        let player_count = self.players.len();
        let team_count = self.teams.len();
        let round_total = self.rounds.len();

        for player in &mut self.players {
            if player.team.is_some_and(|team| team >= team_count) {
                player.team = None;
            }
            if player.results.len() < round_total {
                player.results.resize(round_total, RoundResult::default());
            }
        }

        for team in &mut self.teams {
            team.player_indices.retain(|&index| index < player_count);
        }

        for round in &mut self.rounds {
            let mut seated: HashSet<usize> = HashSet::with_capacity(player_count);
            for table in &mut round.tables {
                for seat in &mut table.seats {
                    if let Some(index) = *seat
                        && (index >= player_count || !seated.insert(index))
                    {
                        *seat = None;
                    }
                }
            }
        }
    }
}

/// Lenient wire decoding helpers.
///
/// Every field is buffered into a `serde_json::Value` first; if the value
/// does not have the expected shape the field's default is used instead of
/// failing the whole document.
mod de {
    use serde::{Deserialize, Deserializer};

    pub fn lenient<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Default + serde::de::DeserializeOwned,
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).unwrap_or_default())
    }

    /// `Option<usize>` as a signed integer, -1 (or anything negative) = none.
    pub mod opt_index {
        use super::*;
        use serde::Serializer;

        pub fn serialize<S>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_i64(value.map_or(super::super::NO_INDEX, |index| index as i64))
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = serde_json::Value::deserialize(deserializer)?;
            Ok(i64::deserialize(value)
                .ok()
                .and_then(|raw| usize::try_from(raw).ok()))
        }
    }

    /// Four seats as an array of signed indices, -1 = empty seat.
    pub mod seat_indices {
        use super::*;
        use crate::competition::entities::SEATS_PER_TABLE;
        use serde::{Serialize, Serializer};

        pub fn serialize<S>(
            seats: &[Option<usize>; SEATS_PER_TABLE],
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let raw: Vec<i64> = seats
                .iter()
                .map(|seat| seat.map_or(super::super::NO_INDEX, |index| index as i64))
                .collect();
            raw.serialize(serializer)
        }

        pub fn deserialize<'de, D>(
            deserializer: D,
        ) -> Result<[Option<usize>; SEATS_PER_TABLE], D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = serde_json::Value::deserialize(deserializer)?;
            let raw = Vec::<i64>::deserialize(value).unwrap_or_default();
            let mut seats = [None; SEATS_PER_TABLE];
            for (seat, index) in seats.iter_mut().zip(raw) {
                *seat = usize::try_from(index).ok();
            }
            Ok(seats)
        }
    }
}
