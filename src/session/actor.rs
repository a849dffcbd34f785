//! Session actor: the single writer of the current competition.
//!
//! All mutation flows through this actor's inbox, which gives the aggregate
//! exactly one logical owner. Reads hand out clones; every successful
//! mutation is persisted before its response is sent, so the document on
//! disk never runs ahead of or behind what callers observed; subscribers
//! get change notifications with dead receivers evicted on delivery.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};

use super::messages::{SessionMessage, SessionNotification, SessionResponse};
use crate::competition::{Competition, CompetitionResult, standings};
use crate::history::HistoryService;

/// Session handle for sending messages.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
}

impl SessionHandle {
    /// Send a raw message to the session.
    pub async fn send(&self, message: SessionMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Session is closed".to_string())
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionMessage,
        closed: T,
    ) -> T {
        let (response, receiver) = oneshot::channel();
        if self.send(build(response)).await.is_err() {
            return closed;
        }
        receiver.await.unwrap_or(closed)
    }

    /// Create a fresh competition.
    pub async fn prepare(
        &self,
        name: &str,
        player_count: usize,
        round_count: usize,
    ) -> SessionResponse {
        let name = name.to_string();
        self.request(
            |response| SessionMessage::Prepare {
                name,
                player_count,
                round_count,
                response,
            },
            SessionResponse::Error("Session is closed".to_string()),
        )
        .await
    }

    /// Name a player during enrollment.
    pub async fn enroll_player(&self, player_index: usize, name: &str) -> SessionResponse {
        let name = name.to_string();
        self.request(
            |response| SessionMessage::EnrollPlayer {
                player_index,
                name,
                response,
            },
            SessionResponse::Error("Session is closed".to_string()),
        )
        .await
    }

    /// Start the next round; the response carries its index.
    pub async fn start_round(&self) -> SessionResponse {
        self.request(
            |response| SessionMessage::StartRound { response },
            SessionResponse::Error("Session is closed".to_string()),
        )
        .await
    }

    /// Assign a round's seats.
    pub async fn assign_seats(
        &self,
        round: usize,
        strategy: crate::competition::PairingStrategy,
    ) -> SessionResponse {
        self.request(
            |response| SessionMessage::AssignSeats {
                round,
                strategy,
                response,
            },
            SessionResponse::Error("Session is closed".to_string()),
        )
        .await
    }

    /// Manually place a player on a seat.
    pub async fn seat_player(
        &self,
        round: usize,
        table_index: usize,
        seat: usize,
        player_index: usize,
    ) -> SessionResponse {
        self.request(
            |response| SessionMessage::SeatPlayer {
                round,
                table_index,
                seat,
                player_index,
                response,
            },
            SessionResponse::Error("Session is closed".to_string()),
        )
        .await
    }

    /// Empty a seat again.
    pub async fn clear_seat(
        &self,
        round: usize,
        table_index: usize,
        seat: usize,
    ) -> SessionResponse {
        self.request(
            |response| SessionMessage::ClearSeat {
                round,
                table_index,
                seat,
                response,
            },
            SessionResponse::Error("Session is closed".to_string()),
        )
        .await
    }

    /// Reset a table's results to unrecorded.
    pub async fn clear_table_results(
        &self,
        round: usize,
        table_index: usize,
    ) -> SessionResponse {
        self.request(
            |response| SessionMessage::ClearTableResults {
                round,
                table_index,
                response,
            },
            SessionResponse::Error("Session is closed".to_string()),
        )
        .await
    }

    /// Record one player's result.
    pub async fn record_result(
        &self,
        round: usize,
        player_index: usize,
        result: crate::competition::RoundResult,
    ) -> SessionResponse {
        self.request(
            |response| SessionMessage::RecordResult {
                round,
                player_index,
                result,
                response,
            },
            SessionResponse::Error("Session is closed".to_string()),
        )
        .await
    }

    /// Close the competition and record it into history.
    pub async fn finish(&self) -> SessionResponse {
        self.request(
            |response| SessionMessage::Finish { response },
            SessionResponse::Error("Session is closed".to_string()),
        )
        .await
    }

    /// Snapshot of the current competition.
    pub async fn competition(&self) -> Option<Competition> {
        self.request(
            |response| SessionMessage::GetCompetition { response },
            None,
        )
        .await
    }

    /// Standings over the first `window` rounds.
    pub async fn standings(&self, window: usize) -> Vec<crate::competition::Standing> {
        self.request(
            |response| SessionMessage::GetStandings { window, response },
            Vec::new(),
        )
        .await
    }

    /// Subscribe to change notifications.
    pub async fn subscribe(
        &self,
        subscriber_id: u64,
        sender: mpsc::Sender<SessionNotification>,
    ) -> Result<(), String> {
        self.send(SessionMessage::Subscribe {
            subscriber_id,
            sender,
        })
        .await
    }

    /// Detach a subscriber.
    pub async fn unsubscribe(&self, subscriber_id: u64) -> Result<(), String> {
        self.send(SessionMessage::Unsubscribe { subscriber_id }).await
    }

    /// Shut the session down.
    pub async fn close(&self) -> SessionResponse {
        self.request(
            |response| SessionMessage::Close { response },
            SessionResponse::Success,
        )
        .await
    }
}

/// Session actor owning the current competition.
pub struct SessionActor {
    /// The current competition, if one has been prepared or restored.
    competition: Option<Competition>,

    /// History and current-competition persistence.
    history: Arc<HistoryService>,

    /// Message inbox.
    inbox: mpsc::Receiver<SessionMessage>,

    /// Subscribers for change notifications.
    subscribers: HashMap<u64, mpsc::Sender<SessionNotification>>,

    /// Set once `Close` is handled.
    is_closed: bool,
}

impl SessionActor {
    /// Create a new session actor and its handle.
    pub fn new(history: Arc<HistoryService>) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(100);
        let actor = Self {
            competition: None,
            history,
            inbox,
            subscribers: HashMap::new(),
            is_closed: false,
        };
        (actor, SessionHandle { sender })
    }

    /// Run the session event loop.
    ///
    /// Restores the persisted current competition first, so an interrupted
    /// competition resumes where it left off.
    pub async fn run(mut self) {
        self.competition = self.history.load_current().await;
        match &self.competition {
            Some(competition) => {
                log::info!(
                    "Session starting with restored competition '{}'",
                    competition.name
                );
            }
            None => log::info!("Session starting with no current competition"),
        }

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;
            if self.is_closed {
                break;
            }
        }

        log::info!("Session closed");
    }

    async fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Prepare {
                name,
                player_count,
                round_count,
                response,
            } => {
                let result = self.handle_prepare(&name, player_count, round_count).await;
                let _ = response.send(result);
            }

            SessionMessage::EnrollPlayer {
                player_index,
                name,
                response,
            } => {
                let result = self
                    .mutate(SessionNotification::EnrollmentChanged, |competition| {
                        competition.enroll_player(player_index, &name)
                    })
                    .await;
                let _ = response.send(result);
            }

            SessionMessage::StartRound { response } => {
                let result = match self.competition.as_mut() {
                    None => SessionResponse::NoCompetition,
                    Some(competition) => match competition.start_new_round() {
                        Ok(round) => {
                            self.after_mutation(SessionNotification::CompetitionChanged)
                                .await;
                            SessionResponse::RoundStarted(round)
                        }
                        Err(err) => SessionResponse::Error(err.to_string()),
                    },
                };
                let _ = response.send(result);
            }

            SessionMessage::AssignSeats {
                round,
                strategy,
                response,
            } => {
                let result = self
                    .mutate(SessionNotification::CompetitionChanged, |competition| {
                        competition.assign_seats(round, &strategy)
                    })
                    .await;
                let _ = response.send(result);
            }

            SessionMessage::SeatPlayer {
                round,
                table_index,
                seat,
                player_index,
                response,
            } => {
                let result = self
                    .mutate(SessionNotification::CompetitionChanged, |competition| {
                        competition.seat_player(round, table_index, seat, player_index)
                    })
                    .await;
                let _ = response.send(result);
            }

            SessionMessage::ClearSeat {
                round,
                table_index,
                seat,
                response,
            } => {
                let result = self
                    .mutate(SessionNotification::CompetitionChanged, |competition| {
                        competition.clear_seat(round, table_index, seat)
                    })
                    .await;
                let _ = response.send(result);
            }

            SessionMessage::RecordResult {
                round,
                player_index,
                result,
                response,
            } => {
                let outcome = self
                    .mutate(SessionNotification::CompetitionChanged, |competition| {
                        competition.record_result(round, player_index, result)
                    })
                    .await;
                let _ = response.send(outcome);
            }

            SessionMessage::ClearTableResults {
                round,
                table_index,
                response,
            } => {
                let result = self
                    .mutate(SessionNotification::CompetitionChanged, |competition| {
                        competition.clear_table_results(round, table_index)
                    })
                    .await;
                let _ = response.send(result);
            }

            SessionMessage::Finish { response } => {
                let result = match self.competition.as_mut() {
                    None => SessionResponse::NoCompetition,
                    Some(competition) => {
                        competition.finish(Utc::now().timestamp() as u64);
                        self.after_mutation(SessionNotification::CompetitionChanged)
                            .await;
                        SessionResponse::Success
                    }
                };
                let _ = response.send(result);
            }

            SessionMessage::GetCompetition { response } => {
                let _ = response.send(self.competition.clone());
            }

            SessionMessage::GetStandings { window, response } => {
                let result = self
                    .competition
                    .as_ref()
                    .map(|competition| standings(competition, window))
                    .unwrap_or_default();
                let _ = response.send(result);
            }

            SessionMessage::Subscribe {
                subscriber_id,
                sender,
            } => {
                self.subscribers.insert(subscriber_id, sender);
                log::debug!("Subscriber {subscriber_id} attached to session");
            }

            SessionMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!("Subscriber {subscriber_id} detached from session");
            }

            SessionMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(SessionResponse::Success);
            }
        }
    }

    async fn handle_prepare(
        &mut self,
        name: &str,
        player_count: usize,
        round_count: usize,
    ) -> SessionResponse {
        let start_time = Utc::now().timestamp() as u64;
        match Competition::prepare(name, player_count, round_count, start_time) {
            Ok(competition) => {
                if let Some(previous) = &self.competition {
                    log::warn!(
                        "Replacing current competition '{}' with '{}'",
                        previous.name,
                        name
                    );
                }
                self.competition = Some(competition);
                self.after_mutation(SessionNotification::EnrollmentChanged)
                    .await;
                SessionResponse::Success
            }
            Err(err) => SessionResponse::Error(err.to_string()),
        }
    }

    /// Apply one engine operation to the current competition; on success,
    /// notify subscribers and persist.
    async fn mutate(
        &mut self,
        notification: SessionNotification,
        operation: impl FnOnce(&mut Competition) -> CompetitionResult<()>,
    ) -> SessionResponse {
        match self.competition.as_mut() {
            None => SessionResponse::NoCompetition,
            Some(competition) => match operation(competition) {
                Ok(()) => {
                    self.after_mutation(notification).await;
                    SessionResponse::Success
                }
                Err(err) => SessionResponse::Error(err.to_string()),
            },
        }
    }

    async fn after_mutation(&mut self, notification: SessionNotification) {
        self.notify_state_change(notification);
        self.persist().await;
    }

    /// Broadcast a change notification to all subscribers, dropping the
    /// ones that went away.
    fn notify_state_change(&mut self, notification: SessionNotification) {
        self.subscribers.retain(|subscriber_id, sender| {
            match sender.try_send(notification) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Subscriber {subscriber_id} channel full, dropping notification");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {subscriber_id} disconnected, removing");
                    false
                }
            }
        });
    }

    /// Persist the current competition; a finished competition is also
    /// recorded into history. Persistence failures are logged, never
    /// surfaced to the caller whose mutation already took effect.
    async fn persist(&self) {
        let Some(competition) = &self.competition else {
            return;
        };
        if let Err(err) = self.history.save_current(competition).await {
            log::error!("Failed to save current competition: {err:#}");
        }
        if competition.is_finished()
            && let Err(err) = self.history.record(competition.clone()).await
        {
            log::error!("Failed to record competition into history: {err:#}");
        }
    }
}
