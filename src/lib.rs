//! # Mahjong Competition
//!
//! A competition engine for four-seat Mahjong events: enrollment, round
//! scheduling, seat/table pairing, score aggregation, ranking, and history
//! persistence.
//!
//! The engine is UI-agnostic. A competition is a plain aggregate owned by a
//! single writer; derived views (cumulative scores, standings, table plans)
//! are pure functions over it. Four interchangeable pairing strategies are
//! dispatched through a closed enum via `enum_dispatch`.
//!
//! ## Core Modules
//!
//! - [`competition`]: entities, lifecycle state machine, scoring, ranking,
//!   and the seat-assignment strategies
//! - [`history`]: JSON persistence of the current competition and of the
//!   competition history, behind an injected storage collaborator
//! - [`session`]: tokio actor that owns all competition mutation and fans
//!   out change notifications
//!
//! ## Example
//!
//! ```
//! use mahjong_competition::{Competition, PairingStrategy};
//!
//! let mut competition = Competition::prepare("Spring Open", 8, 4, 1_700_000_000).unwrap();
//! let round = competition.start_new_round().unwrap();
//! competition
//!     .assign_seats(round, &PairingStrategy::default())
//!     .unwrap();
//! ```

/// Competition data model, lifecycle, scoring, ranking, and pairing.
pub mod competition;
pub use competition::{
    Competition, CompetitionError, CompetitionResult, PairingStrategy, Player, Round, RoundPhase,
    RoundResult, Standing, Table, Team, SEATS_PER_TABLE,
    rank_players, standings,
};

/// Persistence of competitions and the competition history list.
pub mod history;
pub use history::{HistoryConfig, HistoryService, HistoryStorage};

/// Single-writer session actor owning the current competition.
pub mod session;
pub use session::{SessionActor, SessionHandle, SessionMessage, SessionNotification, SessionResponse};
