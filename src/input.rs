use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::grid::Direction::{self, *};

/// Player intent as seen by the session.
pub trait Input {
    /// Refreshes key state; called once per frame before any poll.
    fn update(&mut self) -> Result<()> {
        Ok(())
    }

    /// Direction to move in. Never the reverse of the previously returned one.
    fn poll_direction(&mut self) -> Direction;
    fn poll_pause_press_edge(&mut self) -> bool;
    fn poll_unpause_press_edge(&mut self) -> bool;

    fn quit_requested(&self) -> bool {
        false
    }
}

/// Remembers the last accepted direction and refuses 180° turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionLatch {
    current: Direction,
}

impl DirectionLatch {
    pub fn new(start: Direction) -> Self {
        DirectionLatch { current: start }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    pub fn offer(&mut self, want: Direction) -> Direction {
        if !self.current.is_opposite(want) {
            self.current = want;
        }
        self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    TogglePause,
    Restart,
    Quit,
    None,
}

pub fn classify_key(key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Right),
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::TogglePause,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

/// Keyboard input read from the crossterm event queue. Only press events
/// count, so holding a key never produces a second edge.
pub struct KeyboardInput {
    latch: DirectionLatch,
    wanted: Option<Direction>,
    pause_edge: bool,
    restart_edge: bool,
    quit: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        KeyboardInput {
            latch: DirectionLatch::new(Right),
            wanted: None,
            pause_edge: false,
            restart_edge: false,
            quit: false,
        }
    }

    /// Forgets steering and pending edges for a fresh session.
    pub fn reset(&mut self) {
        self.latch = DirectionLatch::new(Right);
        self.wanted = None;
        self.pause_edge = false;
        self.restart_edge = false;
    }

    /// Space or R pressed since the last call.
    pub fn poll_restart_press_edge(&mut self) -> bool {
        std::mem::take(&mut self.restart_edge)
    }

    fn apply(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match classify_key(key) {
            KeyAction::Steer(dir) => self.wanted = Some(dir),
            KeyAction::TogglePause => {
                self.pause_edge = true;
                // Space doubles as the restart key on the game-over screen.
                if key.code == KeyCode::Char(' ') {
                    self.restart_edge = true;
                }
            }
            KeyAction::Restart => self.restart_edge = true,
            KeyAction::Quit => self.quit = true,
            KeyAction::None => {}
        }
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Input for KeyboardInput {
    fn update(&mut self) -> Result<()> {
        while poll(Duration::ZERO).context("Failed to poll terminal events")? {
            if let Event::Key(key) = read().context("Failed to read terminal event")? {
                self.apply(key);
            }
        }
        Ok(())
    }

    fn poll_direction(&mut self) -> Direction {
        match self.wanted.take() {
            Some(dir) => self.latch.offer(dir),
            None => self.latch.current(),
        }
    }

    fn poll_pause_press_edge(&mut self) -> bool {
        std::mem::take(&mut self.pause_edge)
    }

    fn poll_unpause_press_edge(&mut self) -> bool {
        std::mem::take(&mut self.pause_edge)
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}
