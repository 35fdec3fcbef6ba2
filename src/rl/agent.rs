//! Epsilon-greedy tabular Q-learning agent

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::config::AgentConfig;
use super::q_table::{best_action, max_value, QTable};
use super::state::StateKey;
use crate::game::Direction;

/// Tabular Q-learning agent
///
/// Owns its [`QTable`] and the random source used for exploration.
///
/// # Example
///
/// ```rust
/// use q_snake::game::Direction;
/// use q_snake::rl::{AgentConfig, QAgent, QTable, StateKey};
///
/// let mut agent = QAgent::with_seed(AgentConfig::default(), QTable::new(), 42);
/// let state = StateKey::new(2, 0, Direction::Right);
///
/// let action = agent.choose_action(state);
/// agent.learn(state, action, -1.0, StateKey::new(1, 0, action));
/// assert!(agent.table().contains(&state));
/// ```
pub struct QAgent {
    table: QTable,
    config: AgentConfig,
    rng: StdRng,
}

impl QAgent {
    /// Create an agent around an existing (possibly empty) table
    pub fn new(config: AgentConfig, table: QTable) -> Self {
        Self {
            table,
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an agent whose exploration is reproducible
    pub fn with_seed(config: AgentConfig, table: QTable, seed: u64) -> Self {
        Self {
            table,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick an action for `state` with the epsilon-greedy policy
    ///
    /// Inserts a zero row for an unseen state before deciding.
    pub fn choose_action(&mut self, state: StateKey) -> Direction {
        let values = *self.table.get_or_insert_default(state);

        if self.rng.gen::<f32>() < self.config.epsilon {
            return Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        }

        best_action(&values)
    }

    /// Best known action for `state`, without exploring or touching the table
    pub fn greedy_action(&self, state: &StateKey) -> Direction {
        self.table
            .get(state)
            .map(best_action)
            .unwrap_or(Direction::ALL[0])
    }

    /// Apply one Q-learning update and return the new value of `(state, action)`
    pub fn learn(
        &mut self,
        state: StateKey,
        action: Direction,
        reward: f32,
        next_state: StateKey,
    ) -> f32 {
        let future = max_value(self.table.get_or_insert_default(next_state));

        let slot = &mut self.table.get_or_insert_default(state)[action.index()];
        let old = *slot;
        *slot = old
            + self.config.learning_rate * (reward + self.config.discount * future - old);

        *slot
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn epsilon(&self) -> f32 {
        self.config.epsilon
    }
}
