//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Hyperparameters of the tabular Q-learning agent
///
/// # Example
///
/// ```rust
/// use q_snake::rl::AgentConfig;
///
/// let config = AgentConfig {
///     epsilon: 0.05,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Step size of each update toward the bootstrapped target
    ///
    /// Default: 0.1
    pub learning_rate: f32,

    /// Discount factor for future rewards (gamma)
    ///
    /// Default: 0.9
    pub discount: f32,

    /// Probability of taking a uniformly random action
    ///
    /// Default: 0.2
    pub epsilon: f32,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.discount) {
            return Err(format!("discount must be in [0, 1], got {}", self.discount));
        }

        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            epsilon: 0.2,
        }
    }
}
