use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use wrap_snake::clock::{Clock, FrameClock};
use wrap_snake::display::Display;
use wrap_snake::food::{LazyRng, RandomSource};
use wrap_snake::input::{Input, KeyboardInput};
use wrap_snake::term::TermManager;
use wrap_snake::{GameConfig, Session};

#[derive(Parser)]
#[command(name = "wrap-snake")]
#[command(version, about = "Snake on a 40x25 wrap-around grid")]
struct Cli {
    /// JSON file with game settings; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed food placement instead of drawing from system entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (the terminal is busy with the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Starting frames between moves
    #[arg(long)]
    interval: Option<u32>,

    /// Seconds the snake survives without eating
    #[arg(long)]
    hunger: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(interval) = cli.interval {
        config.move_interval = interval;
        config.min_move_interval = config.min_move_interval.min(interval);
    }
    if let Some(hunger) = cli.hunger {
        config.hunger_limit_secs = hunger;
        config.hunger_warn_secs = config.hunger_warn_secs.min(hunger.saturating_sub(1));
    }
    config.validate().context("Invalid game settings")?;

    let mut term = TermManager::new()?;
    let seed = cli.seed;

    // One random source for the whole process; restarts keep drawing from it.
    with_terminal(&mut term, TermManager::setup, TermManager::restore, |term| match seed {
        Some(seed) => play(&config, term, StdRng::seed_from_u64(seed)),
        None => play(&config, term, LazyRng::new()),
    })
}

/// Runs `body` between `setup` and `restore`. The terminal is restored even
/// when `setup` fails halfway; the first error is the one returned.
fn with_terminal<T, S, R, B>(term: &mut T, setup: S, restore: R, body: B) -> Result<()>
where
    S: FnOnce(&mut T) -> Result<()>,
    R: FnOnce(&mut T) -> Result<()>,
    B: FnOnce(&mut T) -> Result<()>,
{
    let result = setup(&mut *term).and_then(|()| body(&mut *term));
    let restored = restore(term);
    if let (Err(err), Err(restore_err)) = (&result, &restored) {
        tracing::warn!(error = %restore_err, "failed to restore terminal after {:#}", err);
    }
    result.and(restored)
}

fn play<R: RandomSource>(config: &GameConfig, term: &mut TermManager, mut rng: R) -> Result<()> {
    let mut clock = FrameClock::new(config.frames_per_second);
    let mut input = KeyboardInput::new();
    let mut games = 0u32;

    loop {
        games += 1;
        tracing::info!(game = games, "starting session");

        input.reset();
        let mut session = Session::new(config, rng, term.hud_reserved_region());
        let Some(seconds) = session.run(&mut clock, &mut input, &mut *term)? else {
            return Ok(());
        };
        tracing::info!(game = games, seconds, "session finished");
        rng = session.into_rng();

        if !wait_for_restart(&mut clock, &mut input)? {
            return Ok(());
        }
    }
}

/// Spins on frames until SPACE/R (true) or a quit key (false).
fn wait_for_restart(clock: &mut FrameClock, input: &mut KeyboardInput) -> Result<bool> {
    // Drop anything pressed while the game-over delay ran.
    input.update()?;
    input.poll_restart_press_edge();

    loop {
        clock.wait_for_next_frame();
        input.update()?;
        if input.quit_requested() {
            return Ok(false);
        }
        if input.poll_restart_press_edge() {
            return Ok(true);
        }
    }
}

fn init_logging(path: Option<&std::path::Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}
