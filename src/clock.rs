use std::thread::sleep;
use std::time::{Duration, Instant};

/// Fixed-rate frame source that drives the session.
pub trait Clock {
    /// Blocks until the next frame boundary and advances the counters.
    fn wait_for_next_frame(&mut self);
    fn frames_elapsed(&self) -> u32;
    fn seconds_elapsed(&self) -> u32;
    /// True at most once per elapsed second; reading clears it.
    fn consume_second_edge(&mut self) -> bool;
    /// Zeroes the counters for a new session.
    fn reset(&mut self);
}

/// Frame and second counters with a latched second edge. Ticking it is the
/// only way time passes, which makes it usable directly as a test clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTimer {
    frames_per_second: u32,
    frames: u32,
    seconds: u32,
    in_second: u32,
    edge: bool,
}

impl FrameTimer {
    pub fn new(frames_per_second: u32) -> Self {
        debug_assert!(frames_per_second > 0);
        FrameTimer { frames_per_second, frames: 0, seconds: 0, in_second: 0, edge: false }
    }

    pub fn tick(&mut self) {
        self.frames += 1;
        self.in_second += 1;
        if self.in_second >= self.frames_per_second {
            self.in_second = 0;
            self.seconds += 1;
            self.edge = true;
        }
    }
}

impl Clock for FrameTimer {
    fn wait_for_next_frame(&mut self) {
        self.tick();
    }

    fn frames_elapsed(&self) -> u32 {
        self.frames
    }

    fn seconds_elapsed(&self) -> u32 {
        self.seconds
    }

    fn consume_second_edge(&mut self) -> bool {
        std::mem::take(&mut self.edge)
    }

    fn reset(&mut self) {
        *self = FrameTimer::new(self.frames_per_second);
    }
}

/// Wall-clock paced `FrameTimer`: each wait sleeps until the next frame deadline.
pub struct FrameClock {
    timer: FrameTimer,
    frame: Duration,
    deadline: Instant,
}

impl FrameClock {
    pub fn new(frames_per_second: u32) -> Self {
        let frame = Duration::from_secs(1) / frames_per_second.max(1);
        FrameClock {
            timer: FrameTimer::new(frames_per_second),
            frame,
            deadline: Instant::now() + frame,
        }
    }
}

impl Clock for FrameClock {
    fn wait_for_next_frame(&mut self) {
        let now = Instant::now();
        if now < self.deadline {
            sleep(self.deadline - now);
            self.deadline += self.frame;
        } else {
            // Fell behind; resync instead of bursting to catch up.
            self.deadline = now + self.frame;
        }
        self.timer.tick();
    }

    fn frames_elapsed(&self) -> u32 {
        self.timer.frames_elapsed()
    }

    fn seconds_elapsed(&self) -> u32 {
        self.timer.seconds_elapsed()
    }

    fn consume_second_edge(&mut self) -> bool {
        self.timer.consume_second_edge()
    }

    fn reset(&mut self) {
        self.timer.reset();
        self.deadline = Instant::now() + self.frame;
    }
}
