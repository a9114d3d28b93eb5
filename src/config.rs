use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::GRID_W;
use crate::snake::CAPACITY;

/// Tunables for one session. Every duration is counted in frames or whole
/// seconds of the frame cadence, never in wall-clock units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frame cadence of the driving clock
    pub frames_per_second: u32,
    /// Segments at session start
    pub initial_length: usize,
    /// Frames between moves at session start
    pub move_interval: u32,
    /// Fastest the speed ramp may go
    pub min_move_interval: u32,
    /// Seconds between two speed-ups
    pub speedup_period_secs: u32,
    /// Seconds a snake survives without eating
    pub hunger_limit_secs: u32,
    /// Remaining seconds at which the border starts flashing
    pub hunger_warn_secs: u32,
    /// Random draws thrown away before the first food placement
    pub rng_stir_draws: usize,
    /// Frames to hold the final board before the game-over screen
    pub game_over_delay_frames: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 50,
            initial_length: 16,
            move_interval: 8,
            min_move_interval: 2,
            speedup_period_secs: 10,
            hunger_limit_secs: 12,
            hunger_warn_secs: 5,
            rng_stir_draws: 16,
            game_over_delay_frames: 25,
        }
    }
}

impl GameConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let max_len = CAPACITY.min(GRID_W as usize);
        ensure!(self.frames_per_second >= 1, "frames_per_second must be at least 1");
        ensure!(
            (1..=max_len).contains(&self.initial_length),
            "initial_length must be within 1..={}, got {}",
            max_len,
            self.initial_length
        );
        ensure!(self.min_move_interval >= 1, "min_move_interval must be at least 1");
        ensure!(
            self.min_move_interval <= self.move_interval,
            "min_move_interval ({}) exceeds move_interval ({})",
            self.min_move_interval,
            self.move_interval
        );
        ensure!(self.speedup_period_secs >= 1, "speedup_period_secs must be at least 1");
        ensure!(
            self.hunger_warn_secs < self.hunger_limit_secs,
            "hunger_warn_secs ({}) must be below hunger_limit_secs ({})",
            self.hunger_warn_secs,
            self.hunger_limit_secs
        );
        Ok(())
    }
}
