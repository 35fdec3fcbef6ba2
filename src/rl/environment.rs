use tracing::debug;

use super::state::{state_key, StateKey};
use crate::game::{Direction, GameConfig, GameEngine, GameState, StepResult};

/// Totals of an episode that just ended
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    /// 1-based number of the finished episode
    pub episode: usize,
    /// Sum of every reward in the episode, terminal reward included
    pub total_reward: f32,
    pub steps: u32,
    /// Food eaten
    pub score: u32,
}

/// Outcome of one environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub result: StepResult,
    /// Set when the step ended the episode
    pub episode_end: Option<EpisodeSummary>,
}

impl Transition {
    pub fn reward(&self) -> f32 {
        self.result.reward
    }
}

/// Episodic snake environment
///
/// Wraps the game engine and restarts it on termination, so it always
/// holds a live episode. Keeps the running reward of the current episode and
/// the archived totals of finished ones.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
    episode: usize,
    episode_reward: f32,
    reward_history: Vec<f32>,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    pub fn new(config: GameConfig) -> Self {
        Self::from_engine(GameEngine::new(config))
    }

    /// Create an environment whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_engine(GameEngine::with_seed(config, seed))
    }

    fn from_engine(mut engine: GameEngine) -> Self {
        let state = engine.reset();
        Self {
            engine,
            state,
            episode: 1,
            episode_reward: 0.0,
            reward_history: Vec::new(),
        }
    }

    /// Move the snake one cell in `action`
    ///
    /// On termination the episode's total is archived and a fresh episode
    /// begins before this returns; the returned reward still belongs to the
    /// episode that ended.
    pub fn step(&mut self, action: Direction) -> Transition {
        let result = self.engine.step(&mut self.state, action);
        self.episode_reward += result.reward;

        if !result.terminated {
            return Transition {
                result,
                episode_end: None,
            };
        }

        let summary = EpisodeSummary {
            episode: self.episode,
            total_reward: self.episode_reward,
            steps: self.state.steps,
            score: self.state.score,
        };
        debug!(
            episode = summary.episode,
            reward = summary.total_reward,
            steps = summary.steps,
            score = summary.score,
            "episode finished"
        );

        self.reward_history.push(self.episode_reward);
        self.episode += 1;
        self.episode_reward = 0.0;
        self.state = self.engine.reset();

        Transition {
            result,
            episode_end: Some(summary),
        }
    }

    /// Abstracted view of the current state
    pub fn state_key(&self) -> StateKey {
        state_key(&self.state)
    }

    /// Current game state (read-only, e.g. for rendering)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// 1-based number of the episode in progress
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Reward accumulated so far in the episode in progress
    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    /// Total reward of every finished episode, in order
    pub fn reward_history(&self) -> &[f32] {
        &self.reward_history
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
