//! Once-per-second subsystems: the hunger countdown and the speed ramp.

/// Border colouring derived from the hunger countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderTone {
    Calm,
    Warning { flash: bool },
    Starved,
}

/// Seconds left before the snake starves, plus the warning flash bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunger {
    limit: u32,
    warn_start: u32,
    remaining: u32,
    flash: bool,
}

impl Hunger {
    pub fn new(limit: u32, warn_start: u32) -> Self {
        debug_assert!(limit > 0 && warn_start < limit);
        Hunger { limit, warn_start, remaining: limit, flash: false }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn on_feed(&mut self) {
        self.remaining = self.limit;
        self.flash = false;
    }

    /// Counts one second down. Returns true once the countdown has reached
    /// zero, and keeps returning true until the next feed.
    pub fn on_second_tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);

        if self.in_warning_window() {
            self.flash = !self.flash;
        }

        self.remaining == 0
    }

    pub fn tone(&self) -> BorderTone {
        if self.remaining == 0 {
            BorderTone::Starved
        } else if self.in_warning_window() {
            BorderTone::Warning { flash: self.flash }
        } else {
            BorderTone::Calm
        }
    }

    fn in_warning_window(&self) -> bool {
        self.remaining > 0 && self.remaining <= self.warn_start
    }
}

/// Shortens the movement interval by one frame every `period` seconds,
/// down to `min_interval`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedRamp {
    interval: u32,
    min_interval: u32,
    period: u32,
    since_speedup: u32,
}

impl SpeedRamp {
    pub fn new(interval: u32, min_interval: u32, period: u32) -> Self {
        debug_assert!(min_interval >= 1 && min_interval <= interval && period >= 1);
        SpeedRamp { interval, min_interval, period, since_speedup: 0 }
    }

    /// Frames between two moves.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Returns true if the interval just got shorter.
    pub fn on_second_tick(&mut self) -> bool {
        self.since_speedup += 1;
        if self.since_speedup < self.period {
            return false;
        }

        self.since_speedup = 0;
        if self.interval > self.min_interval {
            self.interval -= 1;
            true
        } else {
            false
        }
    }
}
