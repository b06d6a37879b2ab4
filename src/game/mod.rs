//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Persistence comes in through the [`crate::scores::Storage`] trait and the
//! tick is driven from outside, so a [`Game`] runs the same under a real timer
//! or a test.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{GameConfig, GRID_SIZE};
pub use engine::{Game, Snapshot, StepInfo, StepResult};
pub use state::{CollisionType, GameState, Position, Snake};
