/// Persistence integration: real files on disk, reload across service
/// instances, and tolerance of damaged documents.
use std::path::PathBuf;
use std::sync::Arc;

use mahjong_competition::{
    Competition, PairingStrategy, RoundResult,
    history::{FileStorage, HistoryConfig, HistoryService},
};

fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "mahjong-history-{label}-{}-{}",
        std::process::id(),
        chrono::Utc::now().timestamp_micros()
    ))
}

fn service(dir: &PathBuf) -> HistoryService {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = HistoryConfig {
        data_dir: dir.clone(),
        ..HistoryConfig::default()
    };
    HistoryService::new(Arc::new(FileStorage::new(dir.clone())), config)
}

fn played_competition(name: &str, start_time: u64) -> Competition {
    let mut competition = Competition::prepare(name, 4, 2, start_time).unwrap();
    for (index, player) in ["Aki", "Ben", "Cho", "Dan"].iter().enumerate() {
        competition.enroll_player(index, player).unwrap();
    }
    let round = competition.start_new_round().unwrap();
    competition
        .assign_seats(round, &PairingStrategy::default())
        .unwrap();
    for index in 0..4 {
        competition
            .record_result(
                round,
                index,
                RoundResult::new(
                    index as u8 + 1,
                    25.0 - index as f64 * 15.0,
                    20_000 - index as i64 * 12_000,
                ),
            )
            .unwrap();
    }
    competition
}

#[tokio::test]
async fn test_current_competition_survives_a_restart() {
    let dir = scratch_dir("current");

    let competition = played_competition("Interrupted Open", 1_700_000_000);
    service(&dir).save_current(&competition).await.unwrap();

    // A fresh service over the same directory models a process restart.
    let restored = service(&dir).load_current().await.expect("restores");
    assert_eq!(restored, competition);
    assert_eq!(restored.players[0].name, "Aki");
    assert!(restored.is_round_finished(0));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_history_accumulates_across_restarts() {
    let dir = scratch_dir("accumulate");

    let mut first = played_competition("Spring Open", 1_000);
    first.finish(2_000);
    service(&dir).record(first).await.unwrap();

    let mut second = played_competition("Summer Open", 3_000);
    second.finish(4_000);
    service(&dir).record(second).await.unwrap();

    let history = service(&dir).history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].name, "Summer Open");
    assert_eq!(history[1].name, "Spring Open");

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_rerecording_a_competition_updates_its_entry() {
    let dir = scratch_dir("upsert");

    let competition = played_competition("Ongoing", 5_000);
    service(&dir).record(competition.clone()).await.unwrap();

    let mut finished = competition;
    finished.finish(6_000);
    service(&dir).record(finished).await.unwrap();

    let history = service(&dir).history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].finish_time, 6_000);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_damaged_documents_degrade_to_empty() {
    let dir = scratch_dir("damaged");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join("competition.json"), "<not json>")
        .await
        .unwrap();
    tokio::fs::write(dir.join("history_competition.json"), "{\"oops\": 1}")
        .await
        .unwrap();

    let damaged = service(&dir);
    assert!(damaged.load_current().await.is_none());
    assert!(damaged.history().await.is_empty());

    // Recording over the damaged file replaces it with a good one.
    let mut competition = played_competition("Recovery", 7_000);
    competition.finish(8_000);
    damaged.record(competition).await.unwrap();
    assert_eq!(damaged.history().await.len(), 1);
    assert_eq!(service(&dir).history().await.len(), 1);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}
