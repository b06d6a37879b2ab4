use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Direction, GameState, Position, Snapshot, GRID_SIZE};

// LCD palette
const LCD_BACKGROUND: Color = Color::Rgb(155, 182, 84);
const LCD_INK: Color = Color::Rgb(42, 61, 26);
const LCD_GRID: Color = Color::Rgb(122, 154, 66);

/// Width of the board widget: two columns per cell plus borders
const BOARD_WIDTH: u16 = GRID_SIZE as u16 * 2 + 2;
const BOARD_HEIGHT: u16 = GRID_SIZE as u16 + 2;
const GAME_OVER_HEIGHT: u16 = 7;

/// What occupies one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Head(Direction),
    Body,
    Food,
    Empty,
}

impl Cell {
    fn glyph(&self) -> &'static str {
        match self {
            Cell::Head(Direction::Up) => "▲ ",
            Cell::Head(Direction::Down) => "▼ ",
            Cell::Head(Direction::Left) => "◀ ",
            Cell::Head(Direction::Right) => "▶ ",
            Cell::Body => "■ ",
            Cell::Food => "● ",
            Cell::Empty => "· ",
        }
    }
}

/// Classify a board cell for painting
pub fn cell_at(snapshot: &Snapshot<'_>, pos: Position) -> Cell {
    if snapshot.snake.first() == Some(&pos) {
        return Cell::Head(snapshot.heading);
    }
    if snapshot.snake.contains(&pos) {
        return Cell::Body;
    }

    // Food is hidden on the menu and game-over screens
    let food_visible = matches!(snapshot.state, GameState::Playing | GameState::Paused);
    if food_visible && snapshot.food == Some(pos) {
        return Cell::Food;
    }

    Cell::Empty
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot<'_>) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(snapshot);
        frame.render_widget(stats, chunks[0]);

        // Board on the left, scoreboard on the right
        let columns = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Length(BOARD_WIDTH), Constraint::Min(24)])
            .split(chunks[1]);
        let board_area = Rect {
            height: columns[0].height.min(BOARD_HEIGHT),
            ..columns[0]
        };

        let grid = self.render_grid(snapshot);
        frame.render_widget(grid, board_area);

        // The game-over panel sits above the scoreboard, leaving the board visible
        let scores_area = if snapshot.state == GameState::GameOver {
            let side = Layout::default()
                .direction(LayoutDirection::Vertical)
                .constraints([Constraint::Length(GAME_OVER_HEIGHT), Constraint::Min(0)])
                .split(columns[1]);
            let game_over = self.render_game_over(snapshot);
            frame.render_widget(game_over, side[0]);
            side[1]
        } else {
            columns[1]
        };

        let scores = self.render_scoreboard(snapshot);
        frame.render_widget(scores, scores_area);

        // Render footer with the prompt for the current state
        let controls = self.render_controls(snapshot.state);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let mut lines = Vec::new();

        for y in 0..GRID_SIZE {
            let mut spans = Vec::new();

            for x in 0..GRID_SIZE {
                let cell = cell_at(snapshot, Position::new(x, y));
                let style = match cell {
                    Cell::Head(_) => Style::default()
                        .fg(LCD_INK)
                        .add_modifier(Modifier::BOLD),
                    Cell::Body | Cell::Food => Style::default().fg(LCD_INK),
                    Cell::Empty => Style::default().fg(LCD_GRID),
                };
                spans.push(Span::styled(cell.glyph(), style.bg(LCD_BACKGROUND)));
            }

            lines.push(Line::from(spans));
        }

        let title = match snapshot.state {
            GameState::Paused => " PAUSED ",
            _ => " Snake ",
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(LCD_INK).bg(LCD_BACKGROUND))
                .title(title),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}ms", snapshot.tick_interval.as_millis()),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled(
                snapshot.state.label().to_uppercase(),
                Style::default().fg(Color::Cyan),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if snapshot.new_high_score {
            text.push(Line::from(vec![Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_scoreboard(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let lines: Vec<Line> = if snapshot.scoreboard.is_empty() {
            vec![Line::from(Span::styled(
                "No scores yet",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            snapshot
                .scoreboard
                .iter()
                .enumerate()
                .map(|(rank, entry)| {
                    Line::from(format!("{:>2}. {}: {}", rank + 1, entry.name, entry.score))
                })
                .collect()
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" High Scores "),
        )
    }

    fn render_controls(&self, state: GameState) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);
        let prompt = match state {
            GameState::Menu => vec![
                Span::styled("SPACE", key),
                Span::raw(" or click to start | "),
            ],
            GameState::Playing => vec![
                Span::styled("↑↓←→", key),
                Span::raw(" / "),
                Span::styled("WASD", key),
                Span::raw(" / swipe to move | "),
                Span::styled("ESC", key),
                Span::raw(" to pause | "),
            ],
            GameState::Paused => vec![
                Span::styled("ESC", key),
                Span::raw(" or click to resume | "),
            ],
            GameState::GameOver => vec![
                Span::styled("SPACE", key),
                Span::raw(" or click to restart | "),
            ],
        };

        let mut spans = prompt;
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
