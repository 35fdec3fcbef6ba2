use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use q_snake::game::GameConfig;
use q_snake::modes::{TickSpeed, TrainConfig, TrainMode, WatchConfig, WatchMode};
use q_snake::rl::{AgentConfig, OutputPaths};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "q_snake")]
#[command(version, about = "Snake played by a tabular Q-learning agent")]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand)]
enum Mode {
    /// Watch the agent learn in the terminal (default)
    Watch(WatchArgs),
    /// Train without a display for a number of episodes
    Train(TrainArgs),
}

#[derive(Args, Clone)]
struct CommonArgs {
    /// Grid width
    #[arg(long, default_value = "20", global = true)]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "20", global = true)]
    height: usize,

    /// Q-table file, loaded at start and saved at exit
    #[arg(long, default_value = "q_table.json", global = true)]
    table: PathBuf,

    /// Where to write per-episode reward totals at exit
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Exploration rate
    #[arg(long, default_value = "0.2", global = true)]
    epsilon: f32,

    /// Q-learning step size
    #[arg(long, default_value = "0.1", global = true)]
    learning_rate: f32,

    /// Discount factor for future rewards
    #[arg(long, default_value = "0.9", global = true)]
    discount: f32,

    /// Seed for exploration and food placement
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Args, Clone)]
struct WatchArgs {
    /// Initial playback speed
    #[arg(long, value_enum, default_value = "normal")]
    speed: TickSpeed,

    /// Log file (the terminal is taken by the display)
    #[arg(long, default_value = "q_snake.log")]
    log_file: PathBuf,

    /// Skip the reward chart on exit
    #[arg(long)]
    no_plot: bool,
}

impl Default for WatchArgs {
    fn default() -> Self {
        Self {
            speed: TickSpeed::Normal,
            log_file: PathBuf::from("q_snake.log"),
            no_plot: false,
        }
    }
}

#[derive(Args, Clone)]
struct TrainArgs {
    /// Number of episodes to train
    #[arg(long, default_value = "10000")]
    episodes: usize,

    /// Stop after this many moves even if episodes remain
    #[arg(long, default_value = "5000000")]
    max_ticks: u64,

    /// Log progress every N episodes
    #[arg(long, default_value = "500")]
    log_every: usize,

    /// Save the table every N episodes (0 to disable)
    #[arg(long, default_value = "1000")]
    checkpoint_every: usize,
}

impl CommonArgs {
    fn game_config(&self) -> Result<GameConfig> {
        let config = GameConfig::new(self.width, self.height);
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }

    fn agent_config(&self) -> Result<AgentConfig> {
        let config = AgentConfig {
            learning_rate: self.learning_rate,
            discount: self.discount,
            epsilon: self.epsilon,
        };
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }

    fn paths(&self) -> OutputPaths {
        let paths = OutputPaths::new(self.table.clone());
        match &self.history {
            Some(history) => paths.with_history(history.clone()),
            None => paths,
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`)
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Log to a file so the terminal UI is left alone
fn init_file_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

async fn run_watch(common: &CommonArgs, args: WatchArgs) -> Result<()> {
    init_file_logging(&args.log_file)?;

    let mut config = WatchConfig::new(common.paths());
    config.game_config = common.game_config()?;
    config.agent_config = common.agent_config()?;
    config.speed = args.speed;
    config.seed = common.seed;
    config.show_plot = !args.no_plot;

    let mut watch_mode = WatchMode::new(config)?;
    watch_mode.run().await
}

async fn run_train(common: &CommonArgs, args: TrainArgs) -> Result<()> {
    init_stderr_logging();

    let mut config = TrainConfig::new(args.episodes, common.paths());
    config.game_config = common.game_config()?;
    config.agent_config = common.agent_config()?;
    config.max_ticks = args.max_ticks;
    config.log_frequency = args.log_every;
    config.checkpoint_frequency = args.checkpoint_every;
    config.seed = common.seed;

    let mut train_mode = TrainMode::new(config)?;

    // Ctrl+C ends training at the next tick; results are still saved
    let stop = train_mode.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.store(true, Ordering::Relaxed);
        }
    });

    tokio::task::spawn_blocking(move || train_mode.run())
        .await
        .context("Training task panicked")??;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.mode {
        Some(Mode::Train(args)) => run_train(&cli.common, args).await,
        Some(Mode::Watch(args)) => run_watch(&cli.common, args).await,
        None => run_watch(&cli.common, WatchArgs::default()).await,
    }
}
