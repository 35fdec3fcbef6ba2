use serde::{Deserialize, Serialize};

use super::state::Position;

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,

    // Rewards (for RL)
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for each ordinary step
    pub step_penalty: f32,
    /// Penalty for hitting a wall or the snake's own body
    pub death_penalty: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            food_reward: 20.0,
            step_penalty: -1.0,
            death_penalty: -100.0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Cell every new episode starts from (the grid centre)
    pub fn start_position(&self) -> Position {
        Position::new((self.grid_width / 2) as i32, (self.grid_height / 2) as i32)
    }

    /// Check that the grid can hold a snake and a food cell
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.grid_width * self.grid_height < 2 {
            return Err("grid needs room for both the snake and food".to_string());
        }

        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            return Err("grid dimensions exceed coordinate range".to_string());
        }

        Ok(())
    }
}
