//! Headless training mode
//!
//! Runs the same [`Simulation`] tick as watch mode, without a display or a
//! timer, until the requested number of episodes has finished. Progress is
//! logged periodically and the table is checkpointed to its usual path.
//!
//! # Example
//!
//! ```rust,ignore
//! use q_snake::modes::{TrainConfig, TrainMode};
//! use q_snake::rl::OutputPaths;
//!
//! let config = TrainConfig::new(5_000, OutputPaths::new("q_table.json"));
//! let mut train_mode = TrainMode::new(config)?;
//! train_mode.run()?;
//! ```

use anyhow::{anyhow, Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::game::GameConfig;
use crate::rl::{save_table, AgentConfig, OutputPaths, Simulation};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Hard cap on moves, in case the agent learns to loop without dying
    pub max_ticks: u64,

    /// Log training progress every N episodes
    pub log_frequency: usize,

    /// Save the table every N episodes (0 disables checkpoints)
    pub checkpoint_frequency: usize,

    pub game_config: GameConfig,

    pub agent_config: AgentConfig,

    pub paths: OutputPaths,

    pub seed: Option<u64>,
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    pub fn new(num_episodes: usize, paths: OutputPaths) -> Self {
        Self {
            num_episodes,
            max_ticks: 5_000_000,
            log_frequency: 100,
            checkpoint_frequency: 1000,
            game_config: GameConfig::default(),
            agent_config: AgentConfig::default(),
            paths,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.num_episodes == 0 {
            return Err("num_episodes must be at least 1".to_string());
        }

        if self.max_ticks == 0 {
            return Err("max_ticks must be at least 1".to_string());
        }

        if self.log_frequency == 0 {
            return Err("log_frequency must be at least 1".to_string());
        }

        Ok(())
    }
}

/// Headless trainer
pub struct TrainMode {
    simulation: Simulation,
    config: TrainConfig,
    stop: Arc<AtomicBool>,
    episodes_finished: usize,
}

impl TrainMode {
    /// Create the mode, restoring any saved Q-table
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate().map_err(|e| anyhow!(e))?;

        let simulation = Simulation::load(
            config.game_config.clone(),
            config.agent_config.clone(),
            &config.paths.table,
            config.seed,
        )?;

        Ok(Self {
            simulation,
            config,
            stop: Arc::new(AtomicBool::new(false)),
            episodes_finished: 0,
        })
    }

    /// Flag that, once set, ends training at the next tick boundary
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run the training loop and save the results
    ///
    /// Returns the total reward of every episode finished in this run.
    pub fn run(&mut self) -> Result<Vec<f32>> {
        self.log_header();

        let history_start = self.simulation.reward_history().len();

        while self.episodes_finished < self.config.num_episodes {
            if self.stop.load(Ordering::Relaxed) {
                warn!(
                    episodes = self.episodes_finished,
                    "Training interrupted, saving progress"
                );
                break;
            }

            if self.simulation.ticks() >= self.config.max_ticks {
                warn!(
                    max_ticks = self.config.max_ticks,
                    episodes = self.episodes_finished,
                    "Tick limit reached before all episodes finished"
                );
                break;
            }

            if self.simulation.tick().episode_end.is_some() {
                self.on_episode_end()?;
            }
        }

        self.simulation
            .persist(&self.config.paths)
            .context("Failed to save training results")?;

        info!("Training complete");
        info!("{}", self.simulation.stats().format_summary());

        Ok(self.simulation.reward_history()[history_start..].to_vec())
    }

    fn on_episode_end(&mut self) -> Result<()> {
        self.episodes_finished += 1;
        let episode = self.episodes_finished;

        if episode % self.config.log_frequency == 0 {
            info!(
                "[Episode {}/{}] {} | States: {}",
                episode,
                self.config.num_episodes,
                self.simulation.stats().format_summary(),
                self.simulation.agent().table().len()
            );
        }

        if self.config.checkpoint_frequency > 0 && episode % self.config.checkpoint_frequency == 0
        {
            save_table(self.simulation.agent().table(), &self.config.paths.table)
                .with_context(|| format!("Failed to save checkpoint at episode {}", episode))?;
        }

        Ok(())
    }

    fn log_header(&self) {
        let agent = &self.config.agent_config;
        info!(
            episodes = self.config.num_episodes,
            grid = %format!(
                "{}x{}",
                self.config.game_config.grid_width, self.config.game_config.grid_height
            ),
            learning_rate = agent.learning_rate,
            discount = agent.discount,
            epsilon = agent.epsilon,
            known_states = self.simulation.agent().table().len(),
            table = ?self.config.paths.table,
            "Q-learning training"
        );
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::load_table;
    use tempfile::TempDir;

    fn config(temp_dir: &TempDir, episodes: usize) -> TrainConfig {
        let paths = OutputPaths::new(temp_dir.path().join("q.json"))
            .with_history(temp_dir.path().join("rewards.json"));
        let mut config = TrainConfig::new(episodes, paths);
        config.game_config = GameConfig::small();
        config.seed = Some(21);
        config.log_frequency = 5;
        config.checkpoint_frequency = 5;
        config
    }

    #[test]
    fn test_train_config_validation() {
        let temp_dir = TempDir::new().unwrap();
        assert!(config(&temp_dir, 10).validate().is_ok());
        assert!(config(&temp_dir, 0).validate().is_err());

        let mut bad = config(&temp_dir, 10);
        bad.log_frequency = 0;
        assert!(TrainMode::new(bad).is_err());
    }

    #[test]
    fn test_run_finishes_requested_episodes() {
        let temp_dir = TempDir::new().unwrap();
        let mut train_mode = TrainMode::new(config(&temp_dir, 12)).unwrap();

        let rewards = train_mode.run().unwrap();

        assert_eq!(rewards.len(), 12);
        assert!(rewards.iter().all(|r| r.is_finite()));
        assert!(!load_table(&temp_dir.path().join("q.json")).unwrap().is_empty());
        assert!(temp_dir.path().join("rewards.json").exists());
    }

    #[test]
    fn test_tick_limit_stops_training() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(&temp_dir, 1_000_000);
        config.max_ticks = 50;
        let mut train_mode = TrainMode::new(config).unwrap();

        train_mode.run().unwrap();

        assert_eq!(train_mode.simulation().ticks(), 50);
    }

    #[test]
    fn test_stop_flag_ends_training() {
        let temp_dir = TempDir::new().unwrap();
        let mut train_mode = TrainMode::new(config(&temp_dir, 100)).unwrap();
        train_mode.stop_handle().store(true, Ordering::Relaxed);

        let rewards = train_mode.run().unwrap();

        assert!(rewards.is_empty());
        assert_eq!(train_mode.simulation().ticks(), 0);
        assert!(temp_dir.path().join("q.json").exists());
    }

    #[test]
    fn test_training_resumes_from_saved_table() {
        let temp_dir = TempDir::new().unwrap();

        TrainMode::new(config(&temp_dir, 5)).unwrap().run().unwrap();
        let saved = load_table(&temp_dir.path().join("q.json")).unwrap();

        let resumed = TrainMode::new(config(&temp_dir, 5)).unwrap();
        assert_eq!(resumed.simulation().agent().table().len(), saved.len());
    }
}
