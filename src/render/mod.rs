pub mod chart;
pub mod renderer;

pub use chart::render_reward_chart;
pub use renderer::{Hud, Renderer};
