//! Session leaderboard for the racer
//!
//! Lives in memory for as long as the page (or native run) does; nothing is
//! written to storage. Keeps the best [`MAX_HIGH_SCORES`] races, shown on the
//! game-over screen.

use serde::{Deserialize, Serialize};

pub const MAX_HIGH_SCORES: usize = 5;

/// One finished race
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Frames survived
    pub score: u64,
    /// Speed when the race ended
    pub top_speed: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    /// Best first; equal scores keep the earlier race ahead
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished race. Returns its 1-based place on the board, or
    /// None when it didn't make the cut (scoreless races never do).
    pub fn record(&mut self, score: u64, top_speed: f32) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let place = self.entries.partition_point(|e| e.score >= score);
        if place >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(place, HighScoreEntry { score, top_speed });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(place + 1)
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Best score so far, 0 before any scoring race
    pub fn best(&self) -> u64 {
        self.entries.first().map_or(0, |e| e.score)
    }
}
