//! Watch mode: the agent learns live in the terminal
//!
//! Each tick of a tokio interval advances the [`Simulation`] by one move; a
//! separate render interval redraws the board. Quitting saves the Q-table and
//! reward history, then shows the reward chart until a key is pressed.
//!
//! # Controls
//!
//! - Space/P: Pause/unpause
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=turbo)
//! - Q/Esc/Ctrl+C: Save and quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::info;

use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::render::{render_reward_chart, Hud, Renderer};
use crate::rl::{AgentConfig, OutputPaths, Simulation};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TickSpeed {
    /// 250ms per move
    Slow,
    /// 80ms per move
    Normal,
    /// 20ms per move
    Fast,
    /// 1ms per move
    Turbo,
}

impl TickSpeed {
    /// Get the tick interval for this speed
    pub fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(250),
            Self::Normal => Duration::from_millis(80),
            Self::Fast => Duration::from_millis(20),
            Self::Turbo => Duration::from_millis(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::Turbo => "Turbo",
        }
    }
}

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub game_config: GameConfig,
    pub agent_config: AgentConfig,
    pub paths: OutputPaths,
    pub speed: TickSpeed,
    pub seed: Option<u64>,
    /// Show the reward chart after quitting
    pub show_plot: bool,
}

impl WatchConfig {
    pub fn new(paths: OutputPaths) -> Self {
        Self {
            game_config: GameConfig::default(),
            agent_config: AgentConfig::default(),
            paths,
            speed: TickSpeed::Normal,
            seed: None,
            show_plot: true,
        }
    }
}

pub struct WatchMode {
    simulation: Simulation,
    config: WatchConfig,
    renderer: Renderer,
    input_handler: InputHandler,
    speed: TickSpeed,
    paused: bool,
    should_quit: bool,
}

impl WatchMode {
    /// Create the mode, restoring any saved Q-table
    pub fn new(config: WatchConfig) -> Result<Self> {
        let simulation = Simulation::load(
            config.game_config.clone(),
            config.agent_config.clone(),
            &config.paths.table,
            config.seed,
        )?;

        Ok(Self {
            simulation,
            speed: config.speed,
            config,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            paused: false,
            should_quit: false,
        })
    }

    /// Run until the user quits, then persist and show the reward chart
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(
            episode = self.simulation.env().episode(),
            states = self.simulation.agent().table().len(),
            "Watch mode started"
        );

        let result = self.run_game_loop(&mut terminal).await;

        // Whatever stopped the loop, the learned table is kept
        let saved = self.simulation.persist(&self.config.paths);

        let plotted = if result.is_ok() && saved.is_ok() && self.config.show_plot {
            self.show_reward_chart(&mut terminal).await
        } else {
            Ok(())
        };

        self.cleanup_terminal(&mut terminal)?;

        info!("{}", self.simulation.stats().format_summary());

        result?;
        saved?;
        plotted
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = Self::tick_timer(self.speed);

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.simulation.tick();
                    }
                }

                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.render_frame(frame);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn tick_timer(speed: TickSpeed) -> Interval {
        let mut timer = interval(speed.tick_interval());
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        timer
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::TogglePause => {
                self.paused = !self.paused;
            }
            KeyAction::SetSpeed(speed) => {
                self.speed = speed;
                *tick_timer = Self::tick_timer(speed);
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn render_frame(&self, frame: &mut Frame) {
        let hud = Hud {
            episode: self.simulation.env().episode(),
            best_score: self.simulation.stats().best_score(),
            epsilon: self.simulation.agent().epsilon(),
            speed: self.speed.as_str(),
            paused: self.paused,
        };

        self.renderer
            .render(frame, self.simulation.env().state(), &hud);
    }

    async fn show_reward_chart(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let history = self.simulation.reward_history().to_vec();
        let mut event_stream = EventStream::new();

        loop {
            terminal
                .draw(|frame| render_reward_chart(frame, &history))
                .context("Failed to draw reward chart")?;

            tokio::select! {
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => break,
                    // Redraw on resize and anything else
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
