//! Clock sources for the playback loop.

use reel_core::TimeMark;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source the player paces itself against.
pub trait Clock: Send {
    /// Time elapsed since the clock was created.
    fn now(&self) -> TimeMark;

    /// Block for roughly `duration`.
    fn sleep(&self, duration: TimeMark);
}

/// Wall clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> TimeMark {
        TimeMark::from_ticks(self.origin.elapsed().as_micros() as i64)
    }

    fn sleep(&self, duration: TimeMark) {
        if duration > TimeMark::ZERO {
            std::thread::sleep(Duration::from_micros(duration.ticks() as u64));
        }
    }
}

/// Clock that only moves when slept on or advanced by hand.
///
/// Lets the player run faster than real time in tests and offline renders.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: TimeMark) {
        self.now.fetch_add(duration.ticks(), Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimeMark {
        TimeMark::from_ticks(self.now.load(Ordering::Acquire))
    }

    fn sleep(&self, duration: TimeMark) {
        if duration > TimeMark::ZERO {
            self.advance(duration);
        }
    }
}
