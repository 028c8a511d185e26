//! Millisecond time sources.
//!
//! The simulation never reads the time itself: the frame driver asks a
//! `Clock` once per tick and hands the value to `Game::tick`.

use std::cell::Cell;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Milliseconds since an arbitrary origin.  Never decreases.
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction.
#[derive(Clone, Debug)]
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
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn starting_at(ms: u64) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    /// Moves the clock to `ms`.  Earlier values are ignored to keep it monotonic.
    pub fn set(&self, ms: u64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── Fixed-rate pacing ─────────────────────────────────────────────────────────

/// Sleeps out the remainder of each frame so ticks run at a fixed rate.
#[derive(Debug)]
pub struct FixedStep {
    frame: Duration,
    frame_start: Instant,
}

impl FixedStep {
    pub fn per_second(ticks: u32) -> Self {
        Self {
            frame: Duration::from_secs(1) / ticks.max(1),
            frame_start: Instant::now(),
        }
    }

    /// Call at the end of a frame.  Blocks until the frame budget is spent.
    pub fn wait(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
        self.frame_start = Instant::now();
    }
}
