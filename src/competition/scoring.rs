//! Score aggregation: per-round and cumulative score views.
//!
//! Pure functions over a player's result sequence. Indexing past the
//! recorded rounds is a caller bug (the lifecycle keeps result sequences in
//! lockstep with the round list), so it asserts instead of returning an
//! error.

use super::entities::Player;

/// Standard and competition score for round `round` alone.
pub fn current_scores(player: &Player, round: usize) -> (f64, i64) {
    assert!(
        round < player.results.len(),
        "player #{} has no result for round {round}",
        player.serial
    );
    let result = &player.results[round];
    (result.standard_score, result.competition_score)
}

/// Cumulative standard and competition score over rounds `0..=through_round`.
pub fn total_scores(player: &Player, through_round: usize) -> (f64, i64) {
    assert!(
        through_round < player.results.len(),
        "player #{} has no result for round {through_round}",
        player.serial
    );
    player.results[..=through_round]
        .iter()
        .fold((0.0, 0), |(standard, competition), result| {
            (
                standard + result.standard_score,
                competition + result.competition_score,
            )
        })
}
