pub mod gesture;
pub mod handler;

pub use gesture::{Gesture, GestureThresholds};
pub use handler::{InputHandler, KeyAction};
