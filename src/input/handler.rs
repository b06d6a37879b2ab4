use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::gesture::{gesture_command, GestureThresholds};
use crate::game::{Command, Direction, GameState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameCommand(Command),
    Quit,
    None,
}

pub struct InputHandler {
    thresholds: GestureThresholds,
    /// Where the left button went down, in board cells
    press: Option<(f32, f32)>,
}

impl InputHandler {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            press: None,
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Self::turn(Direction::Up),
            KeyCode::Down => Self::turn(Direction::Down),
            KeyCode::Left => Self::turn(Direction::Left),
            KeyCode::Right => Self::turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Self::turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Self::turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Self::turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Self::turn(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Enter => KeyAction::GameCommand(Command::Start),
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => {
                KeyAction::GameCommand(Command::TogglePause)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    /// Track left-button press/release pairs and turn them into commands
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, state: GameState) -> KeyAction {
        // Board cells are two terminal columns wide
        let pos = (f32::from(mouse.column) / 2.0, f32::from(mouse.row));

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press = Some(pos);
                KeyAction::None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(start) = self.press.take() else {
                    return KeyAction::None;
                };
                let gesture = self.thresholds.classify(start, pos);
                tracing::debug!(?gesture, "pointer gesture");

                gesture_command(gesture, state)
                    .map(KeyAction::GameCommand)
                    .unwrap_or(KeyAction::None)
            }
            _ => KeyAction::None,
        }
    }

    fn turn(direction: Direction) -> KeyAction {
        KeyAction::GameCommand(Command::Turn(direction))
    }
}
