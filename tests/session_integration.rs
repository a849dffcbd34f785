/// Session actor integration: the full competition flow through the
/// handle, change notifications, persistence, and restart restore.
use std::sync::Arc;

use mahjong_competition::{
    Competition, PairingStrategy, RoundResult, SessionActor, SessionHandle, SessionNotification,
    SessionResponse,
    history::{HistoryConfig, HistoryService, MemoryStorage},
};
use tokio::sync::mpsc;

fn spawn_session(storage: Arc<MemoryStorage>) -> SessionHandle {
    let _ = env_logger::builder().is_test(true).try_init();
    let history = Arc::new(HistoryService::new(storage, HistoryConfig::default()));
    let (actor, handle) = SessionActor::new(history);
    tokio::spawn(actor.run());
    handle
}

async fn enroll_everyone(handle: &SessionHandle, count: usize) {
    for index in 0..count {
        let response = handle.enroll_player(index, &format!("Player {index}")).await;
        assert!(response.is_success(), "{response:?}");
    }
}

#[tokio::test]
async fn test_no_competition_until_prepared() {
    let handle = spawn_session(Arc::new(MemoryStorage::new()));

    assert!(handle.competition().await.is_none());
    assert!(handle.standings(1).await.is_empty());
    assert_eq!(
        handle.start_round().await,
        SessionResponse::NoCompetition
    );
    assert_eq!(
        handle.enroll_player(0, "Ghost").await,
        SessionResponse::NoCompetition
    );
}

#[tokio::test]
async fn test_full_flow_through_the_handle() {
    let storage = Arc::new(MemoryStorage::new());
    let handle = spawn_session(storage.clone());

    assert!(handle.prepare("Handle Cup", 4, 2).await.is_success());
    enroll_everyone(&handle, 4).await;

    let SessionResponse::RoundStarted(round) = handle.start_round().await else {
        panic!("round should start");
    };
    assert_eq!(round, 0);
    assert!(
        handle
            .assign_seats(round, PairingStrategy::default())
            .await
            .is_success()
    );

    for index in 0..4 {
        let result = RoundResult::new(
            index as u8 + 1,
            25.0 - index as f64 * 15.0,
            20_000 - index as i64 * 12_000,
        );
        assert!(handle.record_result(round, index, result).await.is_success());
    }

    let competition = handle.competition().await.expect("competition exists");
    assert!(competition.is_round_finished(0));

    let standings = handle.standings(round + 1).await;
    assert_eq!(standings[0].player_index, 0);
    assert_eq!(standings[0].total_standard_score, 25.0);

    // Every acknowledged mutation is already on storage.
    let document = storage.document("competition.json").await.unwrap();
    assert!(document.contains("Handle Cup"));
}

#[tokio::test]
async fn test_engine_refusals_come_back_as_errors() {
    let handle = spawn_session(Arc::new(MemoryStorage::new()));

    let response = handle.prepare("Lopsided", 10, 2).await;
    assert_eq!(
        response.error_message().as_deref(),
        Some("player count 10 must be a positive multiple of 4")
    );

    assert!(handle.prepare("Refusals", 4, 1).await.is_success());
    let SessionResponse::RoundStarted(round) = handle.start_round().await else {
        panic!("round should start");
    };

    let recorded = handle
        .record_result(round, 0, RoundResult::new(2, 0.0, 0))
        .await;
    assert!(recorded.is_success());

    // Reseating a started round is refused with the engine's message.
    let refused = handle
        .assign_seats(round, PairingStrategy::default())
        .await;
    assert!(matches!(refused, SessionResponse::Error(_)));
}

#[tokio::test]
async fn test_manual_seating_through_the_handle() {
    let handle = spawn_session(Arc::new(MemoryStorage::new()));
    assert!(handle.prepare("Manual Cup", 4, 1).await.is_success());
    enroll_everyone(&handle, 4).await;
    let SessionResponse::RoundStarted(round) = handle.start_round().await else {
        panic!("round should start");
    };

    for seat in 0..4 {
        assert!(handle.seat_player(round, 0, seat, seat).await.is_success());
    }

    // Moving a seated player needs the old seat cleared first.
    assert!(!handle.seat_player(round, 0, 0, 1).await.is_success());
    assert!(handle.clear_seat(round, 0, 1).await.is_success());
    assert!(handle.seat_player(round, 0, 1, 1).await.is_success());

    for index in 0..4 {
        let result = RoundResult::new(index as u8 + 1, 0.0, 0);
        assert!(handle.record_result(round, index, result).await.is_success());
    }
    let competition = handle.competition().await.expect("competition exists");
    assert!(competition.is_round_finished(round));

    // Clearing the table's results reopens the round.
    assert!(handle.clear_table_results(round, 0).await.is_success());
    let competition = handle.competition().await.expect("competition exists");
    assert!(!competition.is_round_started(round));
}

#[tokio::test]
async fn test_subscribers_hear_about_changes() {
    let handle = spawn_session(Arc::new(MemoryStorage::new()));
    let (sender, mut notifications) = mpsc::channel(16);
    handle.subscribe(7, sender).await.unwrap();

    assert!(handle.prepare("Notify Cup", 4, 2).await.is_success());
    assert_eq!(
        notifications.recv().await,
        Some(SessionNotification::EnrollmentChanged)
    );

    assert!(handle.enroll_player(0, "Aki").await.is_success());
    assert_eq!(
        notifications.recv().await,
        Some(SessionNotification::EnrollmentChanged)
    );

    handle.start_round().await;
    assert_eq!(
        notifications.recv().await,
        Some(SessionNotification::CompetitionChanged)
    );

    // A refused mutation must not notify.
    assert!(!handle.enroll_player(0, "").await.is_success());
    handle.start_round().await;
    assert_eq!(
        notifications.recv().await,
        Some(SessionNotification::CompetitionChanged)
    );
}

#[tokio::test]
async fn test_finish_records_into_history() {
    let storage = Arc::new(MemoryStorage::new());
    let handle = spawn_session(storage.clone());

    assert!(handle.prepare("Archived Cup", 4, 1).await.is_success());
    enroll_everyone(&handle, 4).await;
    assert!(handle.finish().await.is_success());

    let document = storage
        .document("history_competition.json")
        .await
        .expect("history persisted");
    let history: Vec<Competition> = serde_json::from_str(&document).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "Archived Cup");
    assert!(history[0].is_finished());
}

#[tokio::test]
async fn test_restart_restores_the_current_competition() {
    let storage = Arc::new(MemoryStorage::new());

    let handle = spawn_session(storage.clone());
    assert!(handle.prepare("Survivor", 4, 2).await.is_success());
    enroll_everyone(&handle, 4).await;
    handle.close().await;

    // A second actor over the same storage picks the competition back up.
    let restored = spawn_session(storage);
    let competition = restored.competition().await.expect("restored");
    assert_eq!(competition.name, "Survivor");
    assert!(competition.is_enrollment_over());
}
