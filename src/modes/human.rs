use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use super::ticker::Ticker;
use crate::game::{Command, Game, GameState};
use crate::input::{GestureThresholds, InputHandler, KeyAction};
use crate::render::Renderer;
use crate::scores::Storage;

/// Frames are drawn at most this often (about 30 FPS)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode<S: Storage> {
    game: Game<S>,
    renderer: Renderer,
    input_handler: InputHandler,
    ticker: Ticker,
    should_quit: bool,
    needs_redraw: bool,
}

impl<S: Storage> HumanMode<S> {
    pub fn new(game: Game<S>, thresholds: GestureThresholds) -> Self {
        Self {
            game,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(thresholds),
            ticker: Ticker::new(),
            should_quit: false,
            needs_redraw: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        tracing::info!("terminal session started");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        tracing::info!(high_score = self.game.high_score(), "terminal session ended");

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick, only while playing
                _ = self.ticker.tick() => {
                    self.on_tick();
                }

                // Render frame, skipped when nothing changed since the last one
                _ = render_timer.tick() => {
                    if self.needs_redraw {
                        let snapshot = self.game.snapshot();
                        terminal
                            .draw(|frame| self.renderer.render(frame, &snapshot))
                            .context("Failed to draw frame")?;
                        self.needs_redraw = false;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self
                .input_handler
                .handle_mouse_event(mouse, self.game.state()),
            Event::Resize(_, _) => {
                self.needs_redraw = true;
                KeyAction::None
            }
            _ => KeyAction::None,
        };

        match action {
            KeyAction::GameCommand(command) => self.apply(command),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn apply(&mut self, command: Command) {
        let before = self.game.state();
        if self.game.handle(command) {
            self.needs_redraw = true;
        }
        self.sync_ticker(before);
    }

    fn on_tick(&mut self) {
        let result = self.game.tick();
        if result.redraw {
            self.needs_redraw = true;
        }
        self.sync_ticker(GameState::Playing);
    }

    /// Keep exactly one ticker alive while playing, none otherwise
    fn sync_ticker(&mut self, before: GameState) {
        if self.game.state() != GameState::Playing {
            self.ticker.stop();
            return;
        }

        let period = self.game.tick_interval();
        let entered_play = before != GameState::Playing;
        if entered_play || self.ticker.period() != Some(period) {
            self.ticker.start(period);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
