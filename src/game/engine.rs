use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use super::{
    action::{Command, Direction},
    config::{GameConfig, GRID_SIZE},
    food::spawn_food,
    state::{CollisionType, GameState, Position, Snake},
};
use crate::scores::{ScoreEntry, ScoreKeeper, Storage};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game is over after this step
    pub terminated: bool,
    /// Whether the board changed and should be painted again
    pub redraw: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn idle(terminated: bool) -> Self {
        Self {
            terminated,
            redraw: false,
            info: StepInfo {
                ate_food: false,
                collision_type: None,
            },
        }
    }
}

/// Everything a renderer needs to paint one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub state: GameState,
    pub score: u32,
    pub high_score: u32,
    /// The finished game beat the stored high score; a tie does not count
    pub new_high_score: bool,
    /// Snake segments, head first; empty before the first game
    pub snake: &'a [Position],
    pub heading: Direction,
    pub food: Option<Position>,
    pub tick_interval: Duration,
    pub scoreboard: &'a [ScoreEntry],
}

/// One game session: state machine, simulation and score bookkeeping.
///
/// The value is owned by the caller. Nothing here sleeps or schedules; an
/// outside driver calls [`Game::tick`] at the tick interval while the state
/// is [`GameState::Playing`].
pub struct Game<S: Storage> {
    config: GameConfig,
    state: GameState,
    snake: Option<Snake>,
    food: Option<Position>,
    score: u32,
    high_score: u32,
    new_high_score: bool,
    scoreboard: Vec<ScoreEntry>,
    tick_interval: Duration,
    steps: u32,
    scores: ScoreKeeper<S>,
    rng: StdRng,
}

impl<S: Storage> Game<S> {
    /// Create a game in the menu, reading the high score and scoreboard from `storage`
    pub fn new(config: GameConfig, storage: S) -> Self {
        Self::with_rng(config, storage, StdRng::from_entropy())
    }

    /// Same as [`Game::new`] with reproducible food placement
    pub fn with_seed(config: GameConfig, storage: S, seed: u64) -> Self {
        Self::with_rng(config, storage, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, storage: S, rng: StdRng) -> Self {
        let scores = ScoreKeeper::new(storage);
        let high_score = scores.load_high_score();
        let scoreboard = scores.load_scoreboard();
        let tick_interval = config.tick_interval();

        Self {
            config,
            state: GameState::Menu,
            snake: None,
            food: None,
            score: 0,
            high_score,
            new_high_score: false,
            scoreboard,
            tick_interval,
            steps: 0,
            scores,
            rng,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// True after a game over that set a new record
    pub fn new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn snake(&self) -> Option<&Snake> {
        self.snake.as_ref()
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn scoreboard(&self) -> &[ScoreEntry] {
        &self.scoreboard
    }

    pub fn scores(&self) -> &ScoreKeeper<S> {
        &self.scores
    }

    /// Period the scheduler should tick at right now
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state,
            score: self.score,
            high_score: self.high_score,
            new_high_score: self.new_high_score,
            snake: self.snake.as_ref().map(|s| s.body.as_slice()).unwrap_or(&[]),
            heading: self
                .snake
                .as_ref()
                .map(|s| s.direction)
                .unwrap_or(Direction::Right),
            food: self.food,
            tick_interval: self.tick_interval,
            scoreboard: &self.scoreboard,
        }
    }

    /// Feed one command to the state machine.
    ///
    /// Returns true if the game state changed. Commands that do not apply to
    /// the current state are ignored.
    pub fn handle(&mut self, command: Command) -> bool {
        let before = self.state;

        match (self.state, command) {
            (GameState::Menu | GameState::GameOver, Command::Start) => self.start(),
            (GameState::Playing, Command::Pause | Command::TogglePause) => self.pause(),
            (GameState::Paused, Command::Resume | Command::TogglePause) => self.resume(),
            (GameState::Playing, Command::Turn(direction)) => {
                self.change_direction(direction);
            }
            (state, command) => {
                tracing::trace!(state = ?state, command = ?command, "command ignored");
            }
        }

        self.state != before
    }

    /// Begin a fresh game from the menu or the game-over screen.
    ///
    /// Resets the snake, food, score and tick rate. Ignored while a game is
    /// running or paused.
    pub fn start(&mut self) {
        if !matches!(self.state, GameState::Menu | GameState::GameOver) {
            tracing::trace!(state = ?self.state, "start ignored");
            return;
        }

        // Head just left of centre, body trailing towards the left wall
        let head = Position::new(GRID_SIZE / 2 - 1, GRID_SIZE / 2);
        let snake = Snake::new(head, Direction::Right, self.config.initial_snake_length);

        self.food = spawn_food(&snake, &mut self.rng);
        self.snake = Some(snake);
        self.score = 0;
        self.new_high_score = false;
        self.steps = 0;
        self.tick_interval = self.config.tick_interval();
        self.state = GameState::Playing;

        tracing::info!(high_score = self.high_score, "game started");
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
            tracing::info!(score = self.score, "game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
            tracing::info!(score = self.score, "game resumed");
        }
    }

    /// Queue a turn for the next tick.
    ///
    /// The request is checked against the direction committed on the last
    /// tick, not against an earlier queued turn. Returns false if rejected.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        let Some(snake) = self.snake.as_mut() else {
            return false;
        };

        if snake.direction.is_opposite(direction) {
            tracing::debug!(current = ?snake.direction, requested = ?direction, "reversal rejected");
            return false;
        }

        snake.pending_direction = direction;
        true
    }

    /// Execute one step of the game
    pub fn tick(&mut self) -> StepResult {
        if self.state != GameState::Playing {
            return StepResult::idle(self.state == GameState::GameOver);
        }
        let Some(snake) = self.snake.as_mut() else {
            return StepResult::idle(false);
        };

        snake.direction = snake.pending_direction;
        let new_head = snake.next_head();

        let collision = if !new_head.is_on_board() {
            Some(CollisionType::Wall)
        } else if snake.occupies(new_head) {
            Some(CollisionType::SelfCollision)
        } else {
            None
        };

        if let Some(collision_type) = collision {
            self.steps += 1;
            self.game_over(collision_type);

            return StepResult {
                terminated: true,
                redraw: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        let ate_food = self.food == Some(new_head);
        snake.advance(new_head, ate_food);

        if ate_food {
            self.score += 1;
            // A full board leaves the old food in place
            if let Some(food) = spawn_food(snake, &mut self.rng) {
                self.food = Some(food);
            }
            self.speed_up();
            tracing::debug!(score = self.score, food = ?self.food, "food eaten");
        }

        self.steps += 1;
        tracing::trace!(head = ?new_head, steps = self.steps, "tick");

        StepResult {
            terminated: false,
            redraw: true,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    fn speed_up(&mut self) {
        if !self.config.speed_up {
            return;
        }
        let floor = Duration::from_millis(self.config.min_tick_ms);
        let step = Duration::from_millis(self.config.speed_up_step_ms);
        self.tick_interval = self.tick_interval.saturating_sub(step).max(floor);
    }

    fn game_over(&mut self, collision: CollisionType) {
        self.state = GameState::GameOver;
        tracing::info!(score = self.score, collision = ?collision, "game over");

        self.new_high_score = self.score > self.high_score;
        if self.new_high_score {
            self.high_score = self.score;
            if let Err(err) = self.scores.save_high_score(self.high_score) {
                tracing::warn!(error = %err, "could not persist high score");
            }
        }

        if let Err(err) = self.scores.save_score(self.score) {
            tracing::warn!(error = %err, "could not persist scoreboard");
        }
        self.scoreboard = self.scores.load_scoreboard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::{MemoryStorage, HIGH_SCORE_KEY};

    fn new_game() -> Game<MemoryStorage> {
        Game::with_seed(GameConfig::default(), MemoryStorage::new(), 3)
    }

    /// A game in Playing with a hand-placed snake and food
    fn playing_game(
        body: &[(i32, i32)],
        direction: Direction,
        food: (i32, i32),
    ) -> Game<MemoryStorage> {
        let mut game = new_game();
        game.start();
        let body = body.iter().map(|&(x, y)| Position::new(x, y)).collect();
        game.snake = Snake::from_segments(body, direction);
        game.food = Some(Position::new(food.0, food.1));
        game
    }

    fn body(game: &Game<MemoryStorage>) -> Vec<Position> {
        game.snake().unwrap().body.clone()
    }

    #[test]
    fn test_starts_in_menu() {
        let game = new_game();
        assert_eq!(game.state(), GameState::Menu);
        assert_eq!(game.score(), 0);
        assert!(game.snake().is_none());
        assert!(game.snapshot().snake.is_empty());
    }

    #[test]
    fn test_start() {
        let mut game = new_game();
        assert!(game.handle(Command::Start));

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(
            body(&game),
            vec![Position::new(9, 10), Position::new(8, 10), Position::new(7, 10)]
        );
        let snake = game.snake().unwrap();
        assert_eq!(snake.direction, Direction::Right);
        assert_eq!(snake.pending_direction, Direction::Right);

        let food = game.food().unwrap();
        assert!(food.is_on_board());
        assert!(!snake.occupies(food));
        assert_eq!(game.tick_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_state_machine_no_ops() {
        let mut game = new_game();

        // Nothing but Start leaves the menu
        for command in [
            Command::Pause,
            Command::Resume,
            Command::TogglePause,
            Command::Turn(Direction::Up),
        ] {
            assert!(!game.handle(command));
            assert_eq!(game.state(), GameState::Menu);
        }

        game.handle(Command::Start);
        assert!(!game.handle(Command::Start));
        assert!(!game.handle(Command::Resume));
        assert_eq!(game.state(), GameState::Playing);

        game.handle(Command::Pause);
        assert!(!game.handle(Command::Pause));
        assert!(!game.handle(Command::Start));
        assert!(!game.handle(Command::Turn(Direction::Up)));
        assert_eq!(game.state(), GameState::Paused);
        assert_eq!(game.snake().unwrap().pending_direction, Direction::Right);
    }

    #[test]
    fn test_pause_and_resume_preserve_state() {
        let mut game = new_game();
        game.handle(Command::Start);
        game.tick();
        let snake_before = body(&game);
        let food_before = game.food();

        assert!(game.handle(Command::TogglePause));
        assert_eq!(game.state(), GameState::Paused);

        // Ticks while paused do nothing
        let result = game.tick();
        assert!(!result.redraw);
        assert_eq!(body(&game), snake_before);

        assert!(game.handle(Command::TogglePause));
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(body(&game), snake_before);
        assert_eq!(game.food(), food_before);
        assert_eq!(game.steps(), 1);
    }

    #[test]
    fn test_basic_movement() {
        let mut game = playing_game(&[(9, 10), (8, 10), (7, 10)], Direction::Right, (0, 0));

        let result = game.tick();

        assert!(!result.terminated);
        assert!(result.redraw);
        assert!(!result.info.ate_food);
        assert_eq!(
            body(&game),
            vec![Position::new(10, 10), Position::new(9, 10), Position::new(8, 10)]
        );
    }

    #[test]
    fn test_eating_food_grows_snake() {
        let mut game = playing_game(&[(8, 10), (7, 10), (6, 10)], Direction::Right, (9, 10));

        let result = game.tick();

        assert!(result.info.ate_food);
        assert_eq!(game.score(), 1);
        assert_eq!(
            body(&game),
            vec![
                Position::new(9, 10),
                Position::new(8, 10),
                Position::new(7, 10),
                Position::new(6, 10)
            ]
        );
        let food = game.food().unwrap();
        assert_ne!(food, Position::new(9, 10));
        assert!(!game.snake().unwrap().occupies(food));
    }

    #[test]
    fn test_wall_collision() {
        let mut game = playing_game(&[(19, 10), (18, 10), (17, 10)], Direction::Right, (0, 0));
        let before = body(&game);

        let result = game.tick();

        assert!(result.terminated);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.score(), 0);
        assert_eq!(body(&game), before);
    }

    #[test]
    fn test_self_collision() {
        let mut game = playing_game(
            &[(5, 5), (5, 6), (5, 7), (6, 5)],
            Direction::Right,
            (0, 0),
        );

        // Down is not the reverse of Right, so it is accepted
        game.handle(Command::Turn(Direction::Down));
        assert_eq!(game.snake().unwrap().pending_direction, Direction::Down);

        let result = game.tick();

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(game.state(), GameState::GameOver);
    }

    #[test]
    fn test_moving_into_tail_is_a_collision() {
        // The tail has not moved away yet when the head arrives
        let mut game = playing_game(&[(5, 5), (6, 5), (6, 6), (5, 6)], Direction::Left, (0, 0));
        game.change_direction(Direction::Down);

        let result = game.tick();
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_reversal_rejected() {
        let mut game = playing_game(&[(9, 10), (8, 10), (7, 10)], Direction::Right, (0, 0));
        game.change_direction(Direction::Up);

        assert!(!game.change_direction(Direction::Left));
        assert_eq!(game.snake().unwrap().pending_direction, Direction::Up);

        game.tick();
        assert_eq!(game.snake().unwrap().direction, Direction::Up);
        assert_eq!(game.snake().unwrap().head(), Position::new(9, 9));
    }

    #[test]
    fn test_latest_valid_turn_wins() {
        let mut game = playing_game(&[(9, 10), (8, 10), (7, 10)], Direction::Right, (0, 0));

        assert!(game.change_direction(Direction::Up));
        // Checked against Right, the committed direction, so Down is allowed
        // even though Up is queued
        assert!(game.change_direction(Direction::Down));

        game.tick();
        assert_eq!(game.snake().unwrap().head(), Position::new(9, 11));
    }

    #[test]
    fn test_game_over_is_frozen_until_start() {
        let mut game = playing_game(&[(19, 10), (18, 10), (17, 10)], Direction::Right, (0, 0));
        game.score = 4;
        game.tick();
        let frozen = body(&game);

        for _ in 0..5 {
            let result = game.tick();
            assert!(result.terminated);
            assert!(!result.redraw);
        }
        game.handle(Command::Turn(Direction::Up));
        assert_eq!(body(&game), frozen);
        assert_eq!(game.score(), 4);

        assert!(game.handle(Command::Start));
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().unwrap().len(), 3);
    }

    #[test]
    fn test_high_score_only_grows() {
        let mut game = playing_game(&[(19, 10), (18, 10), (17, 10)], Direction::Right, (0, 0));
        game.score = 5;
        game.tick();
        assert_eq!(game.high_score(), 5);

        let mut worse = playing_game(&[(19, 10), (18, 10), (17, 10)], Direction::Right, (0, 0));
        worse.high_score = 5;
        worse.score = 2;
        worse.tick();
        assert_eq!(worse.high_score(), 5);
        assert_eq!(worse.scores().storage().get(HIGH_SCORE_KEY), None);
    }

    #[test]
    fn test_new_high_score_needs_a_strictly_better_game() {
        let mut tie = playing_game(&[(19, 10), (18, 10), (17, 10)], Direction::Right, (0, 0));
        tie.high_score = 5;
        tie.score = 5;
        tie.tick();
        assert_eq!(tie.state(), GameState::GameOver);
        assert!(!tie.new_high_score());
        assert!(!tie.snapshot().new_high_score);

        let mut better = playing_game(&[(19, 10), (18, 10), (17, 10)], Direction::Right, (0, 0));
        better.high_score = 5;
        better.score = 6;
        better.tick();
        assert!(better.new_high_score());
        assert!(better.snapshot().new_high_score);

        // Cleared when the next game starts
        better.handle(Command::Start);
        assert!(!better.new_high_score());
    }

    #[test]
    fn test_start_ignored_mid_game() {
        let mut game = playing_game(&[(9, 10), (8, 10), (7, 10)], Direction::Right, (0, 0));
        game.score = 4;
        game.tick();
        let before = body(&game);

        game.start();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 4);
        assert_eq!(body(&game), before);

        game.pause();
        game.start();
        assert_eq!(game.state(), GameState::Paused);
        assert_eq!(game.score(), 4);
    }

    #[test]
    fn test_game_over_persists_scores() {
        let mut game = playing_game(&[(19, 10), (18, 10), (17, 10)], Direction::Right, (0, 0));
        game.score = 8;
        game.tick();

        assert_eq!(game.scores().load_high_score(), 8);
        assert_eq!(game.scoreboard().len(), 1);
        assert_eq!(game.scoreboard()[0].score, 8);
        assert_eq!(game.snapshot().scoreboard.len(), 1);
    }

    #[test]
    fn test_zero_score_game_leaves_scoreboard_empty() {
        let mut game = playing_game(&[(19, 10), (18, 10), (17, 10)], Direction::Right, (0, 0));
        game.tick();
        assert!(game.scoreboard().is_empty());
        assert_eq!(game.high_score(), 0);
    }

    #[test]
    fn test_scores_loaded_from_storage() {
        let mut storage = MemoryStorage::new();
        storage.set(HIGH_SCORE_KEY, "33".to_string()).unwrap();

        let game = Game::with_seed(GameConfig::default(), storage, 1);
        assert_eq!(game.high_score(), 33);
        assert_eq!(game.snapshot().high_score, 33);
    }

    #[test]
    fn test_length_grows_only_on_food() {
        let mut game = new_game();
        game.handle(Command::Start);

        // Walk a square-ish loop and check the length invariant every tick
        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        for i in 0..200 {
            if game.state() != GameState::Playing {
                break;
            }
            if i % 4 == 0 {
                game.change_direction(turns[(i / 4) % 4]);
            }
            let before = game.snake().unwrap().len();
            let food = game.food();
            let result = game.tick();
            if result.terminated {
                break;
            }
            let after = game.snake().unwrap().len();
            let head = game.snake().unwrap().head();

            assert_eq!(after == before + 1, food == Some(head));
            assert_eq!(result.info.ate_food, after == before + 1);
            if let Some(food) = game.food() {
                assert!(!game.snake().unwrap().occupies(food));
            }
        }
    }

    #[test]
    fn test_speed_up_disabled_by_default() {
        let mut game = playing_game(&[(8, 10), (7, 10), (6, 10)], Direction::Right, (9, 10));
        game.tick();
        assert_eq!(game.tick_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_speed_up_when_enabled() {
        let config = GameConfig {
            speed_up: true,
            tick_ms: 72,
            ..Default::default()
        };
        let mut game = Game::with_seed(config, MemoryStorage::new(), 9);
        game.start();
        game.snake = Snake::from_segments(vec![Position::new(5, 5)], Direction::Right);

        game.food = Some(Position::new(6, 5));
        game.tick();
        assert_eq!(game.tick_interval(), Duration::from_millis(70));

        // Never faster than the floor
        game.food = Some(Position::new(7, 5));
        game.tick();
        assert_eq!(game.tick_interval(), Duration::from_millis(70));

        // A new game resets the rate
        game.state = GameState::GameOver;
        game.start();
        assert_eq!(game.tick_interval(), Duration::from_millis(72));
    }

    #[test]
    fn test_full_board_keeps_previous_food() {
        let mut game = new_game();
        game.start();

        // Fill every cell except (19, 19), with the head next to it
        let mut cells = Vec::new();
        for y in 0..GRID_SIZE {
            let xs: Vec<i32> = if y % 2 == 0 {
                (0..GRID_SIZE).rev().collect()
            } else {
                (0..GRID_SIZE).collect()
            };
            for x in xs {
                cells.push(Position::new(x, y));
            }
        }
        // Drop (19, 19) and make (18, 19) the head
        cells.pop();
        cells.reverse();
        game.snake = Snake::from_segments(cells, Direction::Right);
        game.food = Some(Position::new(19, 19));

        let result = game.tick();
        assert!(result.info.ate_food);
        assert_eq!(game.snake().unwrap().len(), (GRID_SIZE * GRID_SIZE) as usize);
        assert_eq!(game.food(), Some(Position::new(19, 19)));
        assert_eq!(game.state(), GameState::Playing);
    }
}
