//! Platform abstraction layer
//!
//! The seams to the host:
//! - Time: a clock the race reads once per tick
//! - Input: key sets mapped to per-seat control intents

pub mod input;

pub use input::{Key, KeySet};

use std::time::Instant;

/// Source of timestamps in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Monotonic wall clock, zero at construction
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
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock moved by hand, for tests and the headless driver
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { now: start }
    }

    /// Move forward by `secs`; negative steps are ignored
    pub fn advance(&mut self, secs: f64) {
        self.now += secs.max(0.0);
    }

    pub fn set(&mut self, now: f64) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }
}
