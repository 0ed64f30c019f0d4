//! Best-run record
//!
//! The core tracks a single high score in displayed-distance units. The host
//! reads it from whatever storage it owns once at session start and writes it
//! back when a tick reports `GameEvent::HighScore`; this module supplies the
//! JSON envelope so every host stores the same shape.

use serde::{Deserialize, Serialize};

/// Storage key hosts are expected to file the envelope under
pub const STORAGE_KEY: &str = "dino_dash_highscore";

/// A persisted best run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    /// Best displayed distance
    pub score: u32,
    /// Runs played when the score was set
    pub play_count: u32,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a finished run beats the stored best
    pub fn qualifies(&self, score: u32) -> bool {
        score > 0 && score > self.score
    }

    /// Record a run if it qualifies; returns whether the record changed
    pub fn record(&mut self, score: u32, play_count: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.score = score;
        self.play_count = play_count;
        true
    }

    /// Serialize for the host's storage adapter
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a stored envelope; corrupt or missing data starts fresh
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(score) => score,
            Err(err) => {
                log::warn!("discarding unreadable high score: {err}");
                Self::new()
            }
        }
    }
}
