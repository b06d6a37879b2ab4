use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::storage::Storage;
use super::timestamp::now_iso8601;

/// Storage key holding the best score as a decimal string
pub const HIGH_SCORE_KEY: &str = "snake.highscore.v1";
/// Storage key holding the scoreboard as a JSON array
pub const SCOREBOARD_KEY: &str = "snake.highscores.v1";
/// Entries kept on the scoreboard
pub const SCOREBOARD_LEN: usize = 10;
/// Name recorded for every entry; there is no name prompt
pub const PLAYER_NAME: &str = "YOU";

/// One finished game on the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    /// ISO-8601 UTC timestamp of when the game ended
    pub date: String,
}

/// Reads and writes the high score and the top-10 scoreboard.
///
/// Reads never fail: absent or malformed data comes back as zero or an empty
/// list. Writes report storage errors to the caller.
#[derive(Debug)]
pub struct ScoreKeeper<S: Storage> {
    storage: S,
}

impl<S: Storage> ScoreKeeper<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persisted high score, or 0 if absent or corrupt
    pub fn load_high_score(&self) -> u32 {
        self.storage
            .get(HIGH_SCORE_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Overwrite the persisted high score
    pub fn save_high_score(&mut self, value: u32) -> Result<()> {
        self.storage
            .set(HIGH_SCORE_KEY, value.to_string())
            .context("Failed to save high score")
    }

    /// Persisted scoreboard, or an empty list if absent or corrupt
    pub fn load_scoreboard(&self) -> Vec<ScoreEntry> {
        let Some(raw) = self.storage.get(SCOREBOARD_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<ScoreEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(SCOREBOARD_LEN);
                entries
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring corrupt scoreboard");
                Vec::new()
            }
        }
    }

    /// Record a finished game. Zero scores are not recorded.
    pub fn save_score(&mut self, score: u32) -> Result<()> {
        if score == 0 {
            return Ok(());
        }

        self.insert(ScoreEntry {
            name: PLAYER_NAME.to_string(),
            score,
            date: now_iso8601(),
        })
    }

    fn insert(&mut self, entry: ScoreEntry) -> Result<()> {
        let mut entries = self.load_scoreboard();
        entries.push(entry);

        // Stable sort: equal scores keep their insertion order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(SCOREBOARD_LEN);

        let json = serde_json::to_string(&entries).context("Failed to serialize scoreboard")?;
        self.storage
            .set(SCOREBOARD_KEY, json)
            .context("Failed to save scoreboard")
    }
}
