use anyhow::Result;

use crate::grid::{Cell, Region};
use crate::hunger::BorderTone;
use crate::snake::SnakeBody;

/// Cells covered by the "MM:SS" time readout in the top-left corner.
pub const HUD_TIME_REGION: Region = Region::new(0, 0, 5, 1);

/// Drawing surface the session paints on.
pub trait Display {
    fn clear(&mut self) -> Result<()>;
    fn draw_body_full(&mut self, body: &SnakeBody) -> Result<()>;
    /// Erases `vacated` and then draws `new_head`; the two may coincide.
    fn draw_step(&mut self, vacated: Cell, new_head: Cell) -> Result<()>;
    fn draw_grow(&mut self, new_head: Cell) -> Result<()>;
    fn draw_food(&mut self, cell: Cell) -> Result<()>;
    fn erase_cell(&mut self, cell: Cell) -> Result<()>;
    fn draw_elapsed_time(&mut self, seconds: u32) -> Result<()>;
    fn draw_border(&mut self, tone: BorderTone) -> Result<()>;
    fn draw_game_over(&mut self, seconds: u32) -> Result<()>;
    fn draw_pause_overlay(&mut self) -> Result<()>;
    fn hide_pause_overlay(&mut self) -> Result<()>;

    /// Cells food must never be placed on.
    fn hud_reserved_region(&self) -> Region {
        HUD_TIME_REGION
    }

    /// Pushes buffered output; called once per frame.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// `MM:SS`, minutes saturating at 99.
pub fn format_mmss(total_seconds: u32) -> String {
    let minutes = (total_seconds / 60).min(99);
    let seconds = if total_seconds / 60 > 99 { 59 } else { total_seconds % 60 };
    format!("{:02}:{:02}", minutes, seconds)
}
