//! Tabular Q-learning for the Snake game
//!
//! Provides:
//! - State abstraction (food offset + heading)
//! - A lazily grown action-value table with JSON persistence
//! - An epsilon-greedy agent with the one-step Q-learning update
//! - An episodic environment and the simulation context that drives both

pub mod agent;
pub mod config;
pub mod environment;
pub mod persistence;
pub mod q_table;
pub mod simulation;
pub mod state;

pub use agent::QAgent;
pub use config::AgentConfig;
pub use environment::{EpisodeSummary, SnakeEnvironment, Transition};
pub use persistence::{load_table, save_history, save_table};
pub use q_table::{ActionValues, QTable};
pub use simulation::{OutputPaths, Simulation};
pub use state::{encode_state, StateKey};
