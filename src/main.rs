use anyhow::{Context, Result, anyhow};
use clap::Parser;
use neon_snake::game::{GameConfig, GameSession};
use neon_snake::modes::HumanMode;
use neon_snake::storage::{HighScoreStore, JsonFileStore, MemoryStore};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "neon_snake")]
#[command(version, about = "Snake in the terminal, with particles and a persistent high score")]
struct Cli {
    /// JSON file overriding game constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long, default_value = "neon_snake_scores.json")]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Seed for food placement and particles
    #[arg(long)]
    seed: Option<u64>,

    /// Render frames per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Write logs to this file (the terminal belongs to the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Maximum log level
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn init_logging(path: Option<&Path>, level: tracing::Level) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref(), cli.log_level)?;

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.validate().map_err(|msg| anyhow!(msg))?;

    if cli.fps == 0 {
        anyhow::bail!("fps must be at least 1");
    }
    let frame_interval = Duration::from_secs_f64(1.0 / cli.fps as f64);

    let session = match cli.seed {
        Some(seed) => GameSession::seeded(config, seed),
        None => GameSession::new(config),
    };

    let store: Box<dyn HighScoreStore> = if cli.no_persist {
        Box::new(MemoryStore::default())
    } else {
        Box::new(JsonFileStore::new(cli.high_score_file))
    };

    tracing::info!(seed = ?cli.seed, fps = cli.fps, "starting");

    let mut human_mode = HumanMode::new(session, store, frame_interval);
    human_mode.run().await?;

    Ok(())
}
