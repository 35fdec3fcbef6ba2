pub mod train;
pub mod watch;

pub use train::{TrainConfig, TrainMode};
pub use watch::{TickSpeed, WatchConfig, WatchMode};
