use crate::clock::Clock;

/// Pause flag and the accumulated paused time, so the displayed clock only
/// counts seconds spent playing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseClock {
    paused: bool,
    started_at: u32,
    bias: u32,
}

impl PauseClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Total paused seconds so far.
    pub fn bias(&self) -> u32 {
        self.bias
    }

    pub fn begin(&mut self, now: u32) {
        debug_assert!(!self.paused, "pause begun twice");
        self.paused = true;
        self.started_at = now;
    }

    pub fn end(&mut self, now: u32) {
        debug_assert!(self.paused, "pause ended without begin");
        debug_assert!(now >= self.started_at);
        self.bias += now - self.started_at;
        self.paused = false;
    }

    pub fn display_seconds(&self, now: u32) -> u32 {
        now.saturating_sub(self.bias)
    }

    /// Swallows a pending second edge while paused so that resuming does not
    /// fire a hunger or speed tick straight away.
    pub fn drain_pending_second_edge<C: Clock + ?Sized>(&self, clock: &mut C) {
        if self.paused {
            clock.consume_second_edge();
        }
    }
}
