//! Session actor message types.

use tokio::sync::{mpsc, oneshot};

use crate::competition::{Competition, PairingStrategy, RoundResult, Standing};

/// Messages that can be sent to a [`SessionActor`](super::SessionActor).
#[derive(Debug)]
pub enum SessionMessage {
    /// Create a fresh competition, replacing any current one
    Prepare {
        name: String,
        player_count: usize,
        round_count: usize,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Name a player during enrollment
    EnrollPlayer {
        player_index: usize,
        name: String,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Start the next round
    StartRound {
        response: oneshot::Sender<SessionResponse>,
    },

    /// Assign a round's seats with one of the pairing strategies
    AssignSeats {
        round: usize,
        strategy: PairingStrategy,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Manually place a player on a seat
    SeatPlayer {
        round: usize,
        table_index: usize,
        seat: usize,
        player_index: usize,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Empty a seat again
    ClearSeat {
        round: usize,
        table_index: usize,
        seat: usize,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Record one player's result for one round
    RecordResult {
        round: usize,
        player_index: usize,
        result: RoundResult,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Reset a table's results to unrecorded
    ClearTableResults {
        round: usize,
        table_index: usize,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Close the competition and record it into history
    Finish {
        response: oneshot::Sender<SessionResponse>,
    },

    /// Snapshot of the current competition
    GetCompetition {
        response: oneshot::Sender<Option<Competition>>,
    },

    /// Standings over the first `window` rounds
    GetStandings {
        window: usize,
        response: oneshot::Sender<Vec<Standing>>,
    },

    /// Subscribe to change notifications
    Subscribe {
        subscriber_id: u64,
        sender: mpsc::Sender<SessionNotification>,
    },

    /// Unsubscribe from change notifications
    Unsubscribe { subscriber_id: u64 },

    /// Shut the session down
    Close {
        response: oneshot::Sender<SessionResponse>,
    },
}

/// Notification sent after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotification {
    /// Rounds, seats, or results changed
    CompetitionChanged,
    /// A player was named (or the roster was replaced)
    EnrollmentChanged,
}

/// Response from session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResponse {
    /// Operation succeeded
    Success,

    /// A round was started; carries its index
    RoundStarted(usize),

    /// The engine refused the operation
    Error(String),

    /// No competition has been prepared yet
    NoCompetition,
}

impl SessionResponse {
    /// Check if the response is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::RoundStarted(_))
    }

    /// Get the error message, if any.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Error(message) => Some(message.clone()),
            Self::NoCompetition => Some("No competition has been prepared".to_string()),
            _ => None,
        }
    }
}
