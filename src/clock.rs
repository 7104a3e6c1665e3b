//! Monotonic time sources
//!
//! The simulation never reads the wall clock directly. Every timer (spawn
//! cadence, buff expiry) is compared against `Clock::now`, which the game
//! reads once per tick after calling `Clock::advance` with the frame delta.

use std::time::{Duration, Instant};

/// A monotonic time source measured from an arbitrary origin
pub trait Clock {
    /// Called once per tick with the (sanitized) frame delta in seconds
    fn advance(&mut self, dt: f32);

    /// Current time since the clock's origin
    fn now(&self) -> Duration;
}

/// Time is the sum of all frame deltas. Fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    elapsed: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for FrameClock {
    fn advance(&mut self, dt: f32) {
        // Deltas too large for a Duration are dropped rather than panicking
        self.elapsed += Duration::try_from_secs_f32(dt).unwrap_or_default();
    }

    fn now(&self) -> Duration {
        self.elapsed
    }
}

/// Real monotonic time, for hosts whose frame deltas drift from wall time
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for MonotonicClock {
    fn advance(&mut self, _dt: f32) {}

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Externally driven clock: ignores frame deltas, moves only when told to
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time (never moves backwards)
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn advance_by(&mut self, delta: Duration) {
        self.now += delta;
    }
}

impl Clock for ManualClock {
    fn advance(&mut self, _dt: f32) {}

    fn now(&self) -> Duration {
        self.now
    }
}
