//! Simulation-time timers
//!
//! Timers are plain values owned by whatever they schedule for (the spawner,
//! an enemy, a coin). Dropping the owner cancels the timer; nothing can fire
//! for an entity that is no longer in its collection.

use serde::{Deserialize, Serialize};

/// Slack for f32 accumulation so a 0.5 s period fires on the 60th 1/120 s step
const TIMER_EPSILON: f32 = 1e-4;

/// Fires every `period` seconds of accumulated time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepeatingTimer {
    period: f32,
    elapsed: f32,
}

impl RepeatingTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt`; returns how many times the timer fired
    pub fn tick(&mut self, dt: f32) -> u32 {
        if self.period <= 0.0 {
            return 0;
        }
        self.elapsed += dt.max(0.0);
        let mut fired = 0;
        while self.elapsed + TIMER_EPSILON >= self.period {
            self.elapsed = (self.elapsed - self.period).max(0.0);
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Seconds until the next firing
    pub fn remaining(&self) -> f32 {
        (self.period - self.elapsed).max(0.0)
    }
}

/// Gate that opens `interval` seconds after it was last triggered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    interval: f32,
    since: f32,
}

impl Cooldown {
    /// Starts ready so the first trigger is immediate
    pub fn ready(interval: f32) -> Self {
        Self {
            interval,
            since: interval,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        // Saturate so a long idle stretch doesn't grow without bound
        self.since = (self.since + dt.max(0.0)).min(self.interval.max(0.0) + 1.0);
    }

    pub fn is_ready(&self) -> bool {
        self.since + TIMER_EPSILON >= self.interval
    }

    /// Consume the cooldown if ready
    pub fn try_trigger(&mut self) -> bool {
        if self.is_ready() {
            self.since = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.since = self.interval;
    }
}
