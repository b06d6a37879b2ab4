use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Side length of the square board, in cells
pub const GRID_SIZE: i32 = 20;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Milliseconds between ticks at the start of a game
    pub tick_ms: u64,
    /// Fastest tick the speed-up path may reach
    pub min_tick_ms: u64,
    /// Shorten the tick every time food is eaten
    pub speed_up: bool,
    /// How much each food shortens the tick when `speed_up` is on
    pub speed_up_step_ms: u64,

    // Gesture thresholds, in board cells
    /// Shortest drag that counts as a swipe
    pub swipe_min_distance: f32,
    /// Longest drag (on both axes) that still counts as a tap
    pub tap_max_distance: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_snake_length: 3,
            tick_ms: 150,
            min_tick_ms: 70,
            speed_up: false,
            speed_up_step_ms: 2,
            swipe_min_distance: 3.0,
            tap_max_distance: 1.0,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file; missing fields fall back to the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Tick period at the start of a game
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            bail!("tick_ms must be greater than zero");
        }
        if self.min_tick_ms == 0 || self.min_tick_ms > self.tick_ms {
            bail!(
                "min_tick_ms must be between 1 and tick_ms ({}), got {}",
                self.tick_ms,
                self.min_tick_ms
            );
        }
        // The snake starts left of centre and extends towards the left wall
        let max_length = (GRID_SIZE / 2) as usize;
        if self.initial_snake_length == 0 || self.initial_snake_length > max_length {
            bail!(
                "initial_snake_length must be between 1 and {}, got {}",
                max_length,
                self.initial_snake_length
            );
        }
        if self.tap_max_distance <= 0.0 || self.swipe_min_distance <= 0.0 {
            bail!("gesture thresholds must be positive");
        }
        if self.tap_max_distance >= self.swipe_min_distance {
            bail!(
                "tap_max_distance ({}) must be smaller than swipe_min_distance ({})",
                self.tap_max_distance,
                self.swipe_min_distance
            );
        }
        Ok(())
    }
}
