//! Q Snake - a Snake game played by a tabular Q-learning agent
//!
//! This library provides:
//! - Core game logic (game module)
//! - Q-learning agent, table persistence and the simulation context (rl module)
//! - TUI rendering of the board and the reward chart (render module)
//! - Watch and headless training modes (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
