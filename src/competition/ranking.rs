//! Ranking engine: the "high carries high" total order over players.
//!
//! For a window of leading rounds, each player accumulates cumulative
//! scores, a rank histogram, and their best single-round score. Players are
//! then ordered by a strict lexicographic cascade; the serial is the final
//! tiebreak, so the order is always total and deterministic. The same order
//! drives both the standings display and the score-based pairing
//! strategies.

use std::cmp::Ordering;

use super::entities::{Competition, SEATS_PER_TABLE};

/// One player's accumulated standing over a window of rounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    /// Index into [`Competition::players`].
    pub player_index: usize,
    pub serial: u32,
    pub total_standard_score: f64,
    pub total_competition_score: i64,
    /// Count of rounds finished 1st, 2nd, 3rd, 4th.
    pub rank_counts: [u32; SEATS_PER_TABLE],
    /// Highest single-round competition score in the window.
    pub best_round_score: i64,
}

impl Standing {
    fn accumulate(competition: &Competition, player_index: usize, window: usize) -> Self {
        let player = &competition.players[player_index];
        let considered = window.min(player.results.len());

        let mut standing = Self {
            player_index,
            serial: player.serial,
            total_standard_score: 0.0,
            total_competition_score: 0,
            rank_counts: [0; SEATS_PER_TABLE],
            best_round_score: 0,
        };

        for result in &player.results[..considered] {
            standing.total_standard_score += result.standard_score;
            standing.total_competition_score += result.competition_score;
            // Ranks outside 1-4 (unrecorded or damaged) stay out of the
            // histogram.
            if (1..=SEATS_PER_TABLE as u8).contains(&result.rank) {
                standing.rank_counts[result.rank as usize - 1] += 1;
            }
        }

        // The true maximum, even when every round score is negative; zero
        // only stands in for an empty window.
        standing.best_round_score = player.results[..considered]
            .iter()
            .map(|result| result.competition_score)
            .max()
            .unwrap_or(0);

        standing
    }

    /// The ranking cascade, descending ("greater" sorts earlier); ascending
    /// serial as the final tiebreak.
    fn compare(&self, other: &Self) -> Ordering {
        other
            .total_standard_score
            .total_cmp(&self.total_standard_score)
            .then_with(|| other.total_competition_score.cmp(&self.total_competition_score))
            .then_with(|| other.rank_counts[0].cmp(&self.rank_counts[0]))
            .then_with(|| other.rank_counts[1].cmp(&self.rank_counts[1]))
            .then_with(|| other.rank_counts[2].cmp(&self.rank_counts[2]))
            .then_with(|| other.rank_counts[3].cmp(&self.rank_counts[3]))
            .then_with(|| other.best_round_score.cmp(&self.best_round_score))
            .then_with(|| self.serial.cmp(&other.serial))
    }
}

/// Standings over the first `window` rounds, best player first.
///
/// `window` is a round count, not a round index: the standings display
/// through round `r` passes `r + 1`, while pairing for round `r` passes `r`
/// (prior rounds only). A window of zero orders players by serial.
pub fn standings(competition: &Competition, window: usize) -> Vec<Standing> {
    let mut standings: Vec<Standing> = (0..competition.players.len())
        .map(|player_index| Standing::accumulate(competition, player_index, window))
        .collect();
    standings.sort_by(Standing::compare);
    standings
}

/// Player indices over the first `window` rounds, best player first.
pub fn rank_players(competition: &Competition, window: usize) -> Vec<usize> {
    standings(competition, window)
        .into_iter()
        .map(|standing| standing.player_index)
        .collect()
}
