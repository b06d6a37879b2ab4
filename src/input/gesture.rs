//! Pointer gesture classification
//!
//! A press/release pair is either a swipe (long enough drag, mapped to the
//! dominant axis), a tap (short on both axes) or nothing.

use crate::game::{Command, Direction, GameConfig, GameState};

/// What a press/release pair amounts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Swipe(Direction),
    Tap,
    None,
}

/// Distances that separate swipes from taps, in whatever unit the pointer
/// positions use
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    /// Shortest drag on the dominant axis that counts as a swipe
    pub min_swipe: f32,
    /// Both axes must stay under this for a tap
    pub max_tap: f32,
}

impl GestureThresholds {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            min_swipe: config.swipe_min_distance,
            max_tap: config.tap_max_distance,
        }
    }

    /// Classify a drag from `start` to `end`
    pub fn classify(&self, start: (f32, f32), end: (f32, f32)) -> Gesture {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let (abs_dx, abs_dy) = (dx.abs(), dy.abs());

        if abs_dx < self.max_tap && abs_dy < self.max_tap {
            return Gesture::Tap;
        }
        if abs_dx.max(abs_dy) < self.min_swipe {
            return Gesture::None;
        }

        // Ties go to the vertical axis
        let direction = if abs_dx > abs_dy {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };

        Gesture::Swipe(direction)
    }
}

/// Turn a gesture into a command for the game in `state`.
///
/// Swipes steer only while playing; taps start or resume otherwise.
pub fn gesture_command(gesture: Gesture, state: GameState) -> Option<Command> {
    match (gesture, state) {
        (Gesture::Swipe(direction), GameState::Playing) => Some(Command::Turn(direction)),
        (Gesture::Tap, GameState::Menu | GameState::GameOver) => Some(Command::Start),
        (Gesture::Tap, GameState::Paused) => Some(Command::Resume),
        _ => None,
    }
}
