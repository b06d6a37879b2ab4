//! LCD Snake - classic single-player Snake for the terminal
//!
//! This library provides:
//! - Core game logic: state machine, tick step, food spawning (game module)
//! - High score and scoreboard persistence (scores module)
//! - Keyboard and mouse-gesture input (input module)
//! - TUI rendering (render module)
//! - The interactive terminal loop and the scoreboard listing (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod modes;
pub mod render;
pub mod scores;
