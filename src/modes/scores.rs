//! Scoreboard listing for the `scores` mode

use crate::scores::{ScoreKeeper, Storage};

/// Plain-text report of the high score and the scoreboard
pub fn format_scores<S: Storage>(keeper: &ScoreKeeper<S>) -> String {
    let mut out = format!("High score: {}\n", keeper.load_high_score());

    let entries = keeper.load_scoreboard();
    if entries.is_empty() {
        out.push_str("No scores yet\n");
        return out;
    }

    for (rank, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:<6} {:>5}  {}\n",
            rank + 1,
            entry.name,
            entry.score,
            entry.date
        ));
    }
    out
}
