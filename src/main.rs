use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use duel_snake::config::GameConfig;
use duel_snake::game::SnakeGame;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duel-snake")]
#[command(version, about = "Terminal snake against an A* driven opponent")]
struct Cli {
    /// Board width in cells
    #[arg(long, default_value_t = 40)]
    columns: i32,

    /// Board height in cells
    #[arg(long, default_value_t = 30)]
    rows: i32,

    /// Pixel size of one cell
    #[arg(long, default_value_t = 20)]
    unit: i32,

    /// Milliseconds between simulation steps
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Length of both snakes at the start of a match
    #[arg(long, default_value_t = 3)]
    length: usize,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here; the terminal itself is taken by the game
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let config = GameConfig {
        unit: cli.unit,
        columns: cli.columns,
        rows: cli.rows,
        tick_interval: Duration::from_millis(cli.tick_ms),
        initial_length: cli.length,
        seed: cli.seed,
    };

    // The session loop handles restarts itself and returns once the user quits.
    let mut game = SnakeGame::new(config)?;
    game.run()
}
