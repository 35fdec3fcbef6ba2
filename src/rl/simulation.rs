//! Simulation context tying the agent to the environment
//!
//! A [`Simulation`] is owned by whichever loop drives it (terminal UI or
//! headless trainer) and advanced one [`Simulation::tick`] at a time. A tick
//! runs state abstraction, action choice, the environment move and the
//! learning update back to back, so stopping between ticks never leaves a
//! half-applied update.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::agent::QAgent;
use super::config::AgentConfig;
use super::environment::{SnakeEnvironment, Transition};
use super::persistence::{load_table, save_history, save_table};
use crate::game::GameConfig;
use crate::metrics::TrainingStats;

/// Rolling window used for the statistics shown while running
const STATS_WINDOW: usize = 100;

/// Where the learned table and the reward history are written at shutdown
#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// Q-table file, also read at startup
    pub table: PathBuf,
    /// Optional JSON dump of per-episode reward totals
    pub history: Option<PathBuf>,
}

impl OutputPaths {
    pub fn new(table: impl Into<PathBuf>) -> Self {
        Self {
            table: table.into(),
            history: None,
        }
    }

    pub fn with_history(mut self, history: impl Into<PathBuf>) -> Self {
        self.history = Some(history.into());
        self
    }
}

pub struct Simulation {
    agent: QAgent,
    env: SnakeEnvironment,
    stats: TrainingStats,
    ticks: u64,
}

impl Simulation {
    pub fn new(agent: QAgent, env: SnakeEnvironment) -> Self {
        Self {
            agent,
            env,
            stats: TrainingStats::new(STATS_WINDOW),
            ticks: 0,
        }
    }

    /// Build a simulation, restoring the agent's table from `table_path`
    ///
    /// A missing table file starts the agent from scratch; an unreadable one
    /// is an error. `seed` makes both exploration and food placement
    /// reproducible.
    pub fn load(
        game_config: GameConfig,
        agent_config: AgentConfig,
        table_path: &Path,
        seed: Option<u64>,
    ) -> Result<Self> {
        let table = load_table(table_path)?;

        let (agent, env) = match seed {
            Some(seed) => (
                QAgent::with_seed(agent_config, table, seed),
                // Decorrelate the two streams
                SnakeEnvironment::with_seed(game_config, seed.wrapping_add(1)),
            ),
            None => (QAgent::new(agent_config, table), SnakeEnvironment::new(game_config)),
        };

        Ok(Self::new(agent, env))
    }

    /// Advance the game by one move and learn from it
    pub fn tick(&mut self) -> Transition {
        let state = self.env.state_key();
        let action = self.agent.choose_action(state);

        let transition = self.env.step(action);

        let next_state = self.env.state_key();
        self.agent
            .learn(state, action, transition.reward(), next_state);

        if let Some(summary) = &transition.episode_end {
            self.stats.record_episode(
                summary.total_reward,
                summary.steps as usize,
                summary.score,
            );
        }

        self.ticks += 1;
        transition
    }

    /// Save the table and, if configured, the reward history
    pub fn persist(&self, paths: &OutputPaths) -> Result<()> {
        save_table(self.agent.table(), &paths.table)?;

        if let Some(history_path) = &paths.history {
            save_history(self.env.reward_history(), history_path)?;
        }

        Ok(())
    }

    pub fn agent(&self) -> &QAgent {
        &self.agent
    }

    pub fn env(&self) -> &SnakeEnvironment {
        &self.env
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Per-episode reward totals of every finished episode
    pub fn reward_history(&self) -> &[f32] {
        self.env.reward_history()
    }

    /// Ticks run since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
