//! Leaderboard ranking.
//!
//! Uses standard competition ranking: tied scores share a rank and the next
//! distinct score resumes at its 1-based position (1, 2, 2, 4).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

/// A learner's score before ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub user_id: String,
    pub name: String,
    pub score: f64,
}

impl ScoreEntry {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, score: f64) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            score,
        }
    }
}

/// A ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub name: String,
    pub score: f64,
    pub rank: u32,
    pub is_tied: bool,
}

/// Rank entries by descending score.
///
/// Equal scores are ordered by name, then user id, so output is stable for
/// any input order. Non-finite scores are rejected, and `-0.0` ranks as `0.0`.
pub fn rank(entries: Vec<ScoreEntry>) -> Result<Vec<LeaderboardEntry>, ComputeError> {
    if let Some(bad) = entries.iter().find(|e| !e.score.is_finite()) {
        return Err(ComputeError::invalid(
            "score",
            format!("score for {} must be finite, got {}", bad.user_id, bad.score),
        ));
    }

    let mut sorted: Vec<ScoreEntry> = entries
        .into_iter()
        .map(|e| ScoreEntry {
            score: normalize_zero(e.score),
            ..e
        })
        .collect();
    sorted.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    let mut ranked: Vec<LeaderboardEntry> = Vec::with_capacity(sorted.len());
    for (i, entry) in sorted.iter().enumerate() {
        let position = i as u32 + 1;
        let rank = match ranked.last() {
            Some(prev) if same_score(prev.score, entry.score) => prev.rank,
            _ => position,
        };
        let tied_with_next = sorted
            .get(i + 1)
            .is_some_and(|next| same_score(next.score, entry.score));
        let tied_with_prev = ranked.last().is_some_and(|prev| prev.rank == rank);
        ranked.push(LeaderboardEntry {
            user_id: entry.user_id.clone(),
            name: entry.name.clone(),
            score: entry.score,
            rank,
            is_tied: tied_with_prev || tied_with_next,
        });
    }

    Ok(ranked)
}

fn same_score(a: f64, b: f64) -> bool {
    a.total_cmp(&b) == Ordering::Equal
}

// total_cmp orders -0.0 below 0.0
fn normalize_zero(score: f64) -> f64 {
    if score == 0.0 {
        0.0
    } else {
        score
    }
}

/// Share of the field ranked at or below `rank`, as a whole percentage.
///
/// `rank == 0` means "not on the board" and, like an empty board, yields 0.
pub fn percentile(rank: u32, total: u32) -> Result<u8, ComputeError> {
    if total == 0 || rank == 0 {
        return Ok(0);
    }
    if rank > total {
        return Err(ComputeError::invalid(
            "rank",
            format!("{rank} exceeds leaderboard size {total}"),
        ));
    }
    let (r, t) = (rank as u64, total as u64);
    let above = t - r + 1;
    Ok(((above * 200 + t) / (t * 2)) as u8)
}

/// A learner's place on a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub user_id: String,
    /// 0 when the learner is not on the board.
    pub rank: u32,
    pub total: u32,
    pub percentile: u8,
}

/// A ranked leaderboard with per-learner lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(entries: Vec<ScoreEntry>) -> Result<Self, ComputeError> {
        Ok(Self {
            entries: rank(entries)?,
        })
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, user_id: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.user_id == user_id)
    }

    /// Rank of `user_id`, or 0 if absent.
    pub fn user_rank(&self, user_id: &str) -> u32 {
        self.entry(user_id).map_or(0, |e| e.rank)
    }

    pub fn standing(&self, user_id: &str) -> Standing {
        let total = self.entries.len() as u32;
        let rank = self.user_rank(user_id);
        Standing {
            user_id: user_id.to_string(),
            rank,
            total,
            // rank is 0 or comes from this board, so it never exceeds total
            percentile: percentile(rank, total).unwrap_or(0),
        }
    }

    /// The first `n` rows; rows tied with the last one are not included.
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks(board: &[LeaderboardEntry]) -> Vec<(&str, u32)> {
        board.iter().map(|e| (e.user_id.as_str(), e.rank)).collect()
    }

    #[test]
    fn ties_share_rank_and_skip() {
        let board = rank(vec![
            ScoreEntry::new("C", "Cara", 80.0),
            ScoreEntry::new("B", "Ben", 90.0),
            ScoreEntry::new("A", "Ana", 90.0),
        ])
        .unwrap();
        assert_eq!(ranks(&board), vec![("A", 1), ("B", 1), ("C", 3)]);
        assert!(board[0].is_tied && board[1].is_tied);
        assert!(!board[2].is_tied);
    }

    #[test]
    fn competition_ranking_pattern() {
        let board = rank(vec![
            ScoreEntry::new("u1", "a", 100.0),
            ScoreEntry::new("u2", "b", 70.0),
            ScoreEntry::new("u3", "c", 70.0),
            ScoreEntry::new("u4", "d", 50.0),
            ScoreEntry::new("u5", "e", 50.0),
            ScoreEntry::new("u6", "f", 50.0),
            ScoreEntry::new("u7", "g", 10.0),
        ])
        .unwrap();
        let r: Vec<u32> = board.iter().map(|e| e.rank).collect();
        assert_eq!(r, vec![1, 2, 2, 4, 4, 4, 7]);
    }

    #[test]
    fn ordering_is_input_independent() {
        let a = rank(vec![
            ScoreEntry::new("x", "Zed", 5.0),
            ScoreEntry::new("y", "Amy", 5.0),
        ])
        .unwrap();
        let b = rank(vec![
            ScoreEntry::new("y", "Amy", 5.0),
            ScoreEntry::new("x", "Zed", 5.0),
        ])
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].user_id, "y");
    }

    #[test]
    fn empty_board() {
        assert!(rank(vec![]).unwrap().is_empty());
        let board = Leaderboard::new(vec![]).unwrap();
        assert!(board.is_empty());
        assert_eq!(board.user_rank("anyone"), 0);
        let standing = board.standing("anyone");
        assert_eq!((standing.rank, standing.percentile), (0, 0));
    }

    #[test]
    fn rejects_non_finite_scores() {
        let err = rank(vec![ScoreEntry::new("u", "U", f64::NAN)]).unwrap_err();
        assert_eq!(err.argument(), "score");
        assert!(rank(vec![ScoreEntry::new("u", "U", f64::INFINITY)]).is_err());
    }

    #[test]
    fn signed_zero_scores_tie() {
        let board = rank(vec![
            ScoreEntry::new("a", "A", 0.0),
            ScoreEntry::new("b", "B", -0.0),
        ])
        .unwrap();
        assert_eq!(ranks(&board), vec![("a", 1), ("b", 1)]);
        assert!(board.iter().all(|e| e.is_tied));
        assert!(board[1].score.is_sign_positive());

        let board = rank(vec![
            ScoreEntry::new("a", "A", -0.0),
            ScoreEntry::new("b", "B", 5.0),
            ScoreEntry::new("c", "C", 0.0),
        ])
        .unwrap();
        assert_eq!(ranks(&board), vec![("b", 1), ("a", 2), ("c", 2)]);
    }

    #[test]
    fn percentile_values() {
        assert_eq!(percentile(1, 4).unwrap(), 100);
        assert_eq!(percentile(4, 4).unwrap(), 25);
        assert_eq!(percentile(2, 3).unwrap(), 67);
        assert_eq!(percentile(3, 3).unwrap(), 33);
        assert_eq!(percentile(0, 3).unwrap(), 0);
        assert_eq!(percentile(1, 0).unwrap(), 0);
        assert_eq!(percentile(5, 4).unwrap_err().argument(), "rank");
    }

    #[test]
    fn standing_and_top() {
        let board = Leaderboard::new(vec![
            ScoreEntry::new("a", "A", 90.0),
            ScoreEntry::new("b", "B", 90.0),
            ScoreEntry::new("c", "C", 80.0),
            ScoreEntry::new("d", "D", 10.0),
        ])
        .unwrap();
        let standing = board.standing("c");
        assert_eq!(standing.rank, 3);
        assert_eq!(standing.total, 4);
        assert_eq!(standing.percentile, 50);
        assert_eq!(board.standing("zz").rank, 0);
        assert_eq!(board.top(2).len(), 2);
        assert_eq!(board.top(10).len(), 4);
    }
}
