// src/core/clock.rs
// Wall-clock tick source for the control loop.

use std::time::{Duration, Instant};

/// Fixed-period deadline tracker. The first tick is due one period after start.
#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    next_deadline: Instant,
}

impl TickClock {
    /// Starts the clock at `now`
    pub fn new(period: Duration, now: Instant) -> Self {
        TickClock {
            period,
            next_deadline: now + period,
        }
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// True when a deadline has passed. Missed periods collapse into this
    /// one tick; the next deadline stays on the original period grid.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_deadline {
            return false;
        }
        let late = now.duration_since(self.next_deadline);
        let skipped = (late.as_nanos() / self.period.as_nanos().max(1)) as u32;
        self.next_deadline += self.period * (skipped + 1);
        true
    }

    /// How long until the next tick is due
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_deadline.saturating_duration_since(now)
    }
}
