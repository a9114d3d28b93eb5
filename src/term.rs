use std::io::{stdout, Stdout, Write};

use anyhow::{ensure, Context, Result};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use crate::display::{format_mmss, Display, HUD_TIME_REGION};
use crate::grid::{Cell, GRID_H, GRID_W};
use crate::hunger::BorderTone;
use crate::snake::SnakeBody;

const SNAKE_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const EMPTY_CHAR: char = ' ';

const SNAKE_COLOR: Color = Color::Red;
const FOOD_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;

const PAUSE_LINES: [(&str, u8); 2] = [("== PAUSED ==", 12), ("(press SPACE to continue)", 13)];

/// Terminal columns/rows needed: the playfield plus a one-cell border.
pub const MIN_TERM_SIZE: (u16, u16) = (GRID_W as u16 + 2, GRID_H as u16 + 2);

/// Crossterm-backed display. Playfield cell (x, y) sits at terminal
/// position (x + 1, y + 1), inside the border.
pub struct TermManager {
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to read terminal size")?;
        ensure!(
            width >= MIN_TERM_SIZE.0 && height >= MIN_TERM_SIZE.1,
            "terminal is {}x{}, need at least {}x{}",
            width,
            height,
            MIN_TERM_SIZE.0,
            MIN_TERM_SIZE.1
        );
        Ok(TermManager { stdout: stdout() })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Failed to hide cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn put(&mut self, cell: Cell, ch: char, color: Color) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(cell.x as u16 + 1, cell.y as u16 + 1),
            SetForegroundColor(color),
            Print(ch)
        )?;
        Ok(())
    }

    fn text_at(&mut self, x: u8, y: u8, text: &str) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(x as u16 + 1, y as u16 + 1),
            SetForegroundColor(TEXT_COLOR),
            Print(text)
        )?;
        Ok(())
    }

    fn clear_playfield(&mut self) -> Result<()> {
        let blank: String = std::iter::repeat(EMPTY_CHAR).take(GRID_W as usize).collect();
        for y in 0..GRID_H {
            self.text_at(0, y, &blank)?;
        }
        Ok(())
    }

    fn border_color(tone: BorderTone) -> Color {
        match tone {
            BorderTone::Calm => Color::Cyan,
            BorderTone::Warning { flash: true } => Color::Magenta,
            BorderTone::Warning { flash: false } => Color::Red,
            BorderTone::Starved => Color::Red,
        }
    }
}

impl Display for TermManager {
    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, ResetColor, terminal::Clear(ClearType::All))
            .context("Failed to clear terminal")?;
        Ok(())
    }

    fn draw_body_full(&mut self, body: &SnakeBody) -> Result<()> {
        for cell in body.iter() {
            self.put(cell, SNAKE_CHAR, SNAKE_COLOR)?;
        }
        Ok(())
    }

    fn draw_step(&mut self, vacated: Cell, new_head: Cell) -> Result<()> {
        self.erase_cell(vacated)?;
        self.put(new_head, SNAKE_CHAR, SNAKE_COLOR)
    }

    fn draw_grow(&mut self, new_head: Cell) -> Result<()> {
        self.put(new_head, SNAKE_CHAR, SNAKE_COLOR)
    }

    fn draw_food(&mut self, cell: Cell) -> Result<()> {
        self.put(cell, FOOD_CHAR, FOOD_COLOR)
    }

    fn erase_cell(&mut self, cell: Cell) -> Result<()> {
        self.put(cell, EMPTY_CHAR, TEXT_COLOR)
    }

    fn draw_elapsed_time(&mut self, seconds: u32) -> Result<()> {
        self.text_at(HUD_TIME_REGION.x, HUD_TIME_REGION.y, &format_mmss(seconds))
    }

    fn draw_border(&mut self, tone: BorderTone) -> Result<()> {
        let (end_x, end_y) = (MIN_TERM_SIZE.0 - 1, MIN_TERM_SIZE.1 - 1);
        queue!(self.stdout, SetForegroundColor(Self::border_color(tone)))?;

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            queue!(self.stdout, cursor::MoveTo(x, 0), Print(ch), cursor::MoveTo(x, end_y), Print(ch))?;
        }

        for y in 1..end_y {
            queue!(self.stdout, cursor::MoveTo(0, y), Print('|'), cursor::MoveTo(end_x, y), Print('|'))?;
        }
        Ok(())
    }

    fn draw_game_over(&mut self, seconds: u32) -> Result<()> {
        self.clear_playfield()?;
        self.draw_border(BorderTone::Starved)?;
        self.text_at(15, 11, "GAME OVER")?;
        self.text_at(15, 13, &format!("TIME {}", format_mmss(seconds)))?;
        self.text_at(1, 20, "press SPACE or R to restart, Q to quit")
    }

    fn draw_pause_overlay(&mut self) -> Result<()> {
        for (line, y) in PAUSE_LINES {
            self.text_at((GRID_W - line.len() as u8) / 2, y, line)?;
        }
        Ok(())
    }

    fn hide_pause_overlay(&mut self) -> Result<()> {
        for (line, y) in PAUSE_LINES {
            let blank: String = std::iter::repeat(EMPTY_CHAR).take(line.len()).collect();
            self.text_at((GRID_W - line.len() as u8) / 2, y, &blank)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Failed to flush terminal")
    }
}
