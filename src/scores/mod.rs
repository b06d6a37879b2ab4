//! High score and scoreboard persistence
//!
//! The game talks to durable storage only through the [`Storage`] trait, so
//! the same [`ScoreKeeper`] works over a JSON file or an in-memory map.

pub mod keeper;
pub mod storage;
pub mod timestamp;

pub use keeper::{ScoreEntry, ScoreKeeper, HIGH_SCORE_KEY, SCOREBOARD_KEY, SCOREBOARD_LEN};
pub use storage::{FileStorage, MemoryStorage, Storage};
