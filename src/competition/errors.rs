//! Competition error types.

use thiserror::Error;

/// Competition errors.
///
/// Every variant is a refusal: the operation that returned it has not
/// mutated the aggregate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompetitionError {
    /// Player count must be a positive multiple of four
    #[error(
        "player count {0} must be a positive multiple of {seats}",
        seats = crate::competition::SEATS_PER_TABLE
    )]
    InvalidPlayerCount(usize),

    /// Round count must be positive
    #[error("round count must be positive")]
    InvalidRoundCount,

    /// All planned rounds have already been started
    #[error("all {round_count} planned rounds have been started")]
    AllRoundsStarted { round_count: usize },

    /// Round index past the started rounds
    #[error("round {round} does not exist ({started} rounds started)")]
    RoundOutOfRange { round: usize, started: usize },

    /// Player index past the player list
    #[error("player index {0} is out of range")]
    PlayerOutOfRange(usize),

    /// Table index past the round's tables
    #[error("table {0} is out of range")]
    TableOutOfRange(usize),

    /// Seat index past the four seats
    #[error("seat {0} is out of range")]
    SeatOutOfRange(usize),

    /// Rank outside 0-4
    #[error("rank {0} is out of range (expected 0-4)")]
    InvalidRank(u8),

    /// Seats cannot change once scoring has begun
    #[error("round {0} has already started, seats cannot be reassigned")]
    RoundAlreadyStarted(usize),

    /// A player may occupy at most one seat per round
    #[error("player #{serial} is already seated in this round")]
    PlayerAlreadySeated { serial: u32 },

    /// Enrollment requires a non-empty name
    #[error("player name cannot be empty")]
    EmptyName,
}

/// Result type for competition operations.
pub type CompetitionResult<T> = Result<T, CompetitionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_count_error_names_the_table_size() {
        assert_eq!(
            CompetitionError::InvalidPlayerCount(10).to_string(),
            "player count 10 must be a positive multiple of 4"
        );
    }

    #[test]
    fn test_seating_errors_carry_their_context() {
        assert_eq!(
            CompetitionError::PlayerAlreadySeated { serial: 7 }.to_string(),
            "player #7 is already seated in this round"
        );
        assert_eq!(
            CompetitionError::RoundOutOfRange {
                round: 3,
                started: 1
            }
            .to_string(),
            "round 3 does not exist (1 rounds started)"
        );
    }
}
