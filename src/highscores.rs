//! High score table
//!
//! Persisted through a [`Storage`] backend, tracks the top 3 scores.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 3;

/// Top scores, highest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    scores: Vec<u64>,
}

impl Default for HighScores {
    fn default() -> Self {
        Self {
            scores: vec![0; MAX_HIGH_SCORES],
        }
    }
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "homing_strike_highscores";

    /// Build from arbitrary scores (sorted, truncated)
    pub fn from_scores(mut scores: Vec<u64>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { scores }
    }

    /// Scores, highest first
    pub fn scores(&self) -> &[u64] {
        &self.scores
    }

    /// Best score so far
    pub fn best(&self) -> u64 {
        self.scores.first().copied().unwrap_or(0)
    }

    /// Check if a score would enter the table
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.scores.last().map(|&s| score > s).unwrap_or(true)
    }

    /// Rank (1-indexed) a score would take, `None` if it doesn't qualify
    pub fn rank_of(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let pos = self.scores.iter().position(|&s| score > s);
        Some(pos.unwrap_or(self.scores.len()) + 1)
    }

    /// Insert a score, keeping the top 3
    pub fn insert(&mut self, score: u64) {
        self.scores.push(score);
        self.scores.sort_unstable_by(|a, b| b.cmp(a));
        self.scores.truncate(MAX_HIGH_SCORES);
    }

    /// Load from storage; anything missing or malformed yields the defaults
    pub fn load(storage: &dyn Storage) -> Self {
        let Some(json) = storage.get_item(Self::STORAGE_KEY) else {
            log::info!("No high scores found, starting fresh");
            return Self::default();
        };

        match serde_json::from_str::<Vec<u64>>(&json) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.len());
                Self::from_scores(scores)
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high scores: {}", e);
                Self::default()
            }
        }
    }

    /// Persist the table; failures are logged and otherwise ignored
    pub fn save(&self, storage: &mut dyn Storage) {
        match serde_json::to_string(&self.scores) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("High scores saved: {:?}", self.scores),
                Err(e) => log::warn!("Failed to save high scores: {}", e),
            },
            Err(e) => log::warn!("Failed to serialize high scores: {}", e),
        }
    }

    /// Record a finished round's score and persist, returning the new table
    pub fn save_score(&mut self, score: u64, storage: &mut dyn Storage) -> &[u64] {
        self.insert(score);
        self.save(storage);
        &self.scores
    }
}
