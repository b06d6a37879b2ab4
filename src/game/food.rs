use rand::seq::SliceRandom;
use rand::Rng;

use super::config::GRID_SIZE;
use super::state::{Position, Snake};

/// Every board cell the snake does not cover, in column-major order
pub fn empty_cells(snake: &Snake) -> Vec<Position> {
    let mut cells = Vec::with_capacity((GRID_SIZE * GRID_SIZE) as usize);
    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            let pos = Position::new(x, y);
            if !snake.occupies(pos) {
                cells.push(pos);
            }
        }
    }
    cells
}

/// Pick a uniformly random empty cell for the next food.
///
/// Scans the whole board instead of retrying random cells, so it terminates
/// in O(GRID_SIZE²) however full the board is. Returns `None` when the snake
/// covers every cell.
pub fn spawn_food<R: Rng + ?Sized>(snake: &Snake, rng: &mut R) -> Option<Position> {
    empty_cells(snake).choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board_filling_snake(skip: Option<Position>) -> Snake {
        // Boustrophedon path so consecutive segments stay adjacent
        let mut body = Vec::new();
        for y in 0..GRID_SIZE {
            let xs: Vec<i32> = if y % 2 == 0 {
                (0..GRID_SIZE).collect()
            } else {
                (0..GRID_SIZE).rev().collect()
            };
            for x in xs {
                let pos = Position::new(x, y);
                if Some(pos) != skip {
                    body.push(pos);
                }
            }
        }
        Snake::from_segments(body, Direction::Right).unwrap()
    }

    #[test]
    fn test_food_avoids_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::new(Position::new(9, 10), Direction::Right, 3);

        for _ in 0..500 {
            let food = spawn_food(&snake, &mut rng).unwrap();
            assert!(food.is_on_board());
            assert!(!snake.occupies(food));
        }
    }

    #[test]
    fn test_empty_cell_count() {
        let snake = Snake::new(Position::new(9, 10), Direction::Right, 3);
        assert_eq!(empty_cells(&snake).len(), (GRID_SIZE * GRID_SIZE) as usize - 3);
    }

    #[test]
    fn test_single_empty_cell_is_chosen() {
        let hole = Position::new(13, 7);
        let snake = board_filling_snake(Some(hole));
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(spawn_food(&snake, &mut rng), Some(hole));
    }

    #[test]
    fn test_full_board_spawns_nothing() {
        let snake = board_filling_snake(None);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(empty_cells(&snake).is_empty());
        assert_eq!(spawn_food(&snake, &mut rng), None);
    }

    #[test]
    fn test_spawn_covers_the_board() {
        // Every empty cell should be reachable; a biased picker would miss some
        let snake = Snake::new(Position::new(9, 10), Direction::Right, 3);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..20_000 {
            seen.insert(spawn_food(&snake, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), empty_cells(&snake).len());
    }
}
