//! Competition core: data model, lifecycle, scoring, ranking, and pairing.
//!
//! This module provides the engine behind a four-seat Mahjong competition:
//! - Plain entity records with index-based weak references
//! - The round lifecycle state machine (enrollment, round start, result
//!   entry, round-finished gating)
//! - Per-round and cumulative score aggregation
//! - The "high carries high" ranking cascade
//! - Four interchangeable seat-assignment strategies
//!
//! ## Example
//!
//! ```
//! use mahjong_competition::competition::{
//!     Competition, PairingStrategy, RoundResult, SnakePairing, standings,
//! };
//!
//! let mut competition = Competition::prepare("Autumn Cup", 8, 4, 1_700_000_000)?;
//! for index in 0..8 {
//!     competition.enroll_player(index, &format!("Player {index}"))?;
//! }
//!
//! let round = competition.start_new_round()?;
//! competition.assign_seats(round, &PairingStrategy::from(SnakePairing))?;
//! competition.record_result(round, 0, RoundResult::new(1, 40.0, 32_000))?;
//!
//! let leader = &standings(&competition, round + 1)[0];
//! assert_eq!(leader.player_index, 0);
//! # Ok::<(), mahjong_competition::CompetitionError>(())
//! ```

pub mod entities;
pub mod errors;
pub mod lifecycle;
pub mod pairing;
pub mod ranking;
pub mod scoring;

pub use entities::{Competition, Player, Round, RoundResult, SEATS_PER_TABLE, Table, Team};
pub use errors::{CompetitionError, CompetitionResult};
pub use lifecycle::RoundPhase;
pub use pairing::{
    PairingStrategy, PlanSeats, RandomPairing, ScorePairing, SerialPairing, SnakePairing,
};
pub use ranking::{Standing, rank_players, standings};
pub use scoring::{current_scores, total_scores};
