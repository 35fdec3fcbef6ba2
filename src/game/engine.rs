use super::{
    action::Direction,
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

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
    /// Reward for this step
    pub reward: f32,
    /// Whether the episode has ended
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a new episode: one-cell snake at the start cell heading right
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(self.config.start_position(), Direction::Right);

        // A valid config always leaves at least one free cell next to a single-cell snake
        let food = self
            .spawn_food(&snake)
            .unwrap_or_else(|| snake.head().moved_in_direction(Direction::Right));

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Move the snake one cell in `direction`
    ///
    /// A terminated result leaves `state` as it was before the move; starting
    /// the next episode is up to the caller.
    pub fn step(&mut self, state: &mut GameState, direction: Direction) -> StepResult {
        let new_head = state.snake.head().moved_in_direction(direction);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.steps += 1;

            return StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        let ate_food = new_head == state.food;

        state.snake.advance(new_head, ate_food);
        state.snake.direction = direction;
        state.steps += 1;

        if !ate_food {
            return StepResult {
                reward: self.config.step_penalty,
                terminated: false,
                info: StepInfo {
                    ate_food,
                    collision_type: None,
                },
            };
        }

        state.score += 1;

        // The snake covering every cell ends the episode: there is nowhere left to eat
        let terminated = match self.spawn_food(&state.snake) {
            Some(food) => {
                state.food = food;
                false
            }
            None => true,
        };

        StepResult {
            reward: self.config.food_reward,
            terminated,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // Every current segment counts, the tail included
        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random cell not covered by the snake
    ///
    /// Rejection-samples the whole grid. Returns `None` only when the snake
    /// fills the grid.
    pub fn spawn_food(&mut self, snake: &Snake) -> Option<Position> {
        if snake.len() >= self.config.grid_width * self.config.grid_height {
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset();

        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.body, vec![Position::new(10, 10)]);
        assert_eq!(state.snake.direction, Direction::Right);
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_plain_step_costs_one() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Position::new(0, 0);

        let result = engine.step(&mut state, Direction::Up);

        assert_eq!(result.reward, -1.0);
        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(state.snake.body, vec![Position::new(10, 9)]);
        assert_eq!(state.snake.direction, Direction::Up);
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Position::new(11, 10);

        let result = engine.step(&mut state, Direction::Right);

        assert_eq!(result.reward, 20.0);
        assert!(result.info.ate_food);
        assert!(!result.terminated);
        assert_eq!(state.score, 1);
        assert_eq!(
            state.snake.body,
            vec![Position::new(11, 10), Position::new(10, 10)]
        );
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 1);
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left),
            Position::new(5, 5),
            10,
            10,
        );

        let result = engine.step(&mut state, Direction::Left);

        assert!(result.terminated);
        assert_eq!(result.reward, -100.0);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
    }

    #[test]
    fn test_reversing_into_neck_is_self_collision() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 1);
        let snake = Snake::from_segments(
            vec![Position::new(5, 5), Position::new(4, 5)],
            Direction::Right,
        );
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        let result = engine.step(&mut state, Direction::Left);

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_moving_into_tail_cell_collides() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 1);
        // Square loop: the head's left neighbour is the tail
        let snake = Snake::from_segments(
            vec![
                Position::new(5, 5),
                Position::new(5, 4),
                Position::new(4, 4),
                Position::new(4, 5),
            ],
            Direction::Down,
        );
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        let result = engine.step(&mut state, Direction::Left);

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_spawn_food_avoids_snake() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 3);
        let snake = Snake::from_segments(
            vec![Position::new(5, 5), Position::new(5, 6), Position::new(5, 7)],
            Direction::Up,
        );

        for _ in 0..1000 {
            let food = engine.spawn_food(&snake).unwrap();
            assert!(!snake.occupies(food));
            assert!((0..10).contains(&food.x));
            assert!((0..10).contains(&food.y));
        }
    }

    #[test]
    fn test_spawn_food_finds_last_free_cell() {
        let mut engine = GameEngine::with_seed(GameConfig::new(2, 2), 3);
        let snake = Snake::from_segments(
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)],
            Direction::Left,
        );

        assert_eq!(engine.spawn_food(&snake), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_eating_last_free_cell_ends_episode() {
        let mut engine = GameEngine::with_seed(GameConfig::new(2, 1), 3);
        let mut state = GameState::new(
            Snake::new(Position::new(0, 0), Direction::Right),
            Position::new(1, 0),
            2,
            1,
        );

        let result = engine.step(&mut state, Direction::Right);

        assert!(result.info.ate_food);
        assert!(result.terminated);
        assert_eq!(result.reward, 20.0);
        assert_eq!(engine.spawn_food(&state.snake), None);
    }
}
