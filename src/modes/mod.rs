pub mod human;
pub mod scores;
pub mod ticker;

pub use human::HumanMode;
pub use scores::format_scores;
pub use ticker::Ticker;
