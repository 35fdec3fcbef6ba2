use serde::{Deserialize, Serialize};

use crate::game::{Direction, GameState, Position, Snake};

/// Compact view of a game situation used to index the Q-table
///
/// Only the food offset relative to the head and the last move survive; the
/// rest of the body is invisible to the agent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct StateKey {
    /// `food.x - head.x`
    pub dx: i32,
    /// `food.y - head.y`
    pub dy: i32,
    pub direction: Direction,
}

impl StateKey {
    pub fn new(dx: i32, dy: i32, direction: Direction) -> Self {
        Self { dx, dy, direction }
    }
}

/// Abstract a snake, its food and its heading into a [`StateKey`]
pub fn encode_state(snake: &Snake, food: Position, direction: Direction) -> StateKey {
    let head = snake.head();
    StateKey::new(food.x - head.x, food.y - head.y, direction)
}

/// Abstract the current game state, using the snake's own heading
pub fn state_key(state: &GameState) -> StateKey {
    encode_state(&state.snake, state.food, state.snake.direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_food_minus_head() {
        let snake = Snake::new(Position::new(10, 10), Direction::Right);
        let key = encode_state(&snake, Position::new(3, 14), Direction::Up);

        assert_eq!(key, StateKey::new(-7, 4, Direction::Up));
    }

    #[test]
    fn test_body_shape_is_ignored() {
        let food = Position::new(2, 2);
        let straight = Snake::from_segments(
            vec![Position::new(5, 5), Position::new(5, 6), Position::new(5, 7)],
            Direction::Up,
        );
        let bent = Snake::from_segments(
            vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(7, 6),
            ],
            Direction::Up,
        );
        let head_only = Snake::new(Position::new(5, 5), Direction::Up);

        let expected = encode_state(&head_only, food, Direction::Left);
        assert_eq!(encode_state(&straight, food, Direction::Left), expected);
        assert_eq!(encode_state(&bent, food, Direction::Left), expected);
    }

    #[test]
    fn test_direction_distinguishes_keys() {
        let snake = Snake::new(Position::new(1, 1), Direction::Up);
        let food = Position::new(4, 1);

        assert_ne!(
            encode_state(&snake, food, Direction::Up),
            encode_state(&snake, food, Direction::Down)
        );
    }

    #[test]
    fn test_state_key_uses_snake_heading() {
        let state = GameState::new(
            Snake::new(Position::new(4, 4), Direction::Down),
            Position::new(6, 1),
            10,
            10,
        );

        assert_eq!(state_key(&state), StateKey::new(2, -3, Direction::Down));
    }
}
