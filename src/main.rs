//! Stacktris: falling-block puzzle in the terminal, with hold, ghost piece and a three-piece preview.

mod app;
mod board;
mod config;
mod game;
mod ghost;
mod input;
mod piece;
mod ui;

use anyhow::{Context, Result, ensure};
use app::App;
use clap::Parser;
use config::{GameConfig, InputDelays, SpeedCurve};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    ensure!(
        args.frame_rate > 0.0,
        "frame rate must be positive, got {}",
        args.frame_rate
    );
    let config = args.game_config();
    config.validate().context("invalid game configuration")?;
    log::info!("starting with {config:?}");

    let mut app = App::new(config, args.frame_rate, args.no_menu);
    app.run()?;
    Ok(())
}

/// Logs go to a file: stderr would draw over the alternate screen.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_module_path(false)
        .init();
    Ok(())
}

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "stacktris",
    version,
    about = "Falling-block puzzle in the terminal. Fill rows to clear them; the game speeds up every 10 lines.",
    long_about = "Stacktris is a terminal falling-block puzzle.\n\n\
        Steer falling pieces; full rows disappear and score 10 points each. Every 10 cleared \
        lines raise the level and shorten the gravity interval.\n\n\
        CONTROLS:\n  Left/Right  Move    Up       Rotate      Down   Soft drop\n  \
        Space       Hard drop   Z     Hold        X      Swap with hold\n  \
        Enter       Start       Y     Restart     N/Q    Quit"
)]
pub struct Args {
    /// Playfield width in columns.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: usize,

    /// Playfield height in rows.
    #[arg(long, default_value = "17", value_name = "ROWS")]
    pub height: usize,

    /// Gravity interval at level 1.
    #[arg(long, default_value = "600", value_name = "MS")]
    pub drop_ms: u64,

    /// Gravity interval reduction per level.
    #[arg(long, default_value = "50", value_name = "MS")]
    pub drop_step_ms: u64,

    /// Shortest gravity interval.
    #[arg(long, default_value = "200", value_name = "MS")]
    pub min_drop_ms: u64,

    /// Minimum time between horizontal moves while a key is held.
    #[arg(long, default_value = "100", value_name = "MS")]
    pub move_delay_ms: u64,

    /// Minimum time between rotations.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub rotate_delay_ms: u64,

    /// Minimum time between soft drops.
    #[arg(long, default_value = "300", value_name = "MS")]
    pub soft_drop_delay_ms: u64,

    /// Minimum time between hard drops.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub hard_drop_delay_ms: u64,

    /// Minimum time between hold (or swap) actions.
    #[arg(long, default_value = "300", value_name = "MS")]
    pub hold_delay_ms: u64,

    /// Target render frames per second; input is sampled once per frame.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Skip main menu and start game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Write logs to this file (filter with RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.width,
            height: self.height,
            speed: SpeedCurve {
                initial: Duration::from_millis(self.drop_ms),
                step: Duration::from_millis(self.drop_step_ms),
                floor: Duration::from_millis(self.min_drop_ms),
            },
            delays: InputDelays {
                shift: Duration::from_millis(self.move_delay_ms),
                rotate: Duration::from_millis(self.rotate_delay_ms),
                soft_drop: Duration::from_millis(self.soft_drop_delay_ms),
                hard_drop: Duration::from_millis(self.hard_drop_delay_ms),
                hold: Duration::from_millis(self.hold_delay_ms),
            },
        }
    }
}
