// src/navigation/controller.rs
// Fixed-period control loop: gates on sensor readiness, then emits one
// velocity command per tick from the selected motion profile.

use super::profile::{MotionProfile, VelocityCommand};
use crate::core::ReadinessTracker;
use log::info;

/// Control loop state. There is no way back from `Publishing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// At least one sensor stream has not delivered yet
    WaitingForSensors,
    /// Emitting one command per tick
    Publishing,
}

/// Owns the profile selection and the elapsed-time accumulator
#[derive(Debug, Clone)]
pub struct ControlLoop {
    profile: MotionProfile,
    time_step: f64,
    elapsed: f64,
    ticks_emitted: u64,
    state: LoopState,
}

impl ControlLoop {
    /// Creates a loop in `WaitingForSensors`. `time_step` is the tick period in seconds.
    pub fn new(profile: MotionProfile, time_step: f64) -> Self {
        ControlLoop {
            profile,
            time_step,
            elapsed: 0.0,
            ticks_emitted: 0,
            state: LoopState::WaitingForSensors,
        }
    }

    /// Runs one tick. Returns the command to publish, or `None` while waiting.
    pub fn tick(&mut self, readiness: &ReadinessTracker) -> Option<VelocityCommand> {
        if self.state == LoopState::WaitingForSensors && readiness.is_fully_ready() {
            self.state = LoopState::Publishing;
            info!("All sensors ready, publishing {} commands", self.profile);
        }

        if self.state == LoopState::WaitingForSensors {
            return None;
        }

        let command = self.profile.velocity_at(self.elapsed);
        self.elapsed += self.time_step;
        self.ticks_emitted += 1;
        Some(command)
    }

    /// Selected motion profile
    pub fn profile(&self) -> MotionProfile {
        self.profile
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Seconds of motion accumulated so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Commands emitted so far
    pub fn ticks_emitted(&self) -> u64 {
        self.ticks_emitted
    }

    /// Elapsed-time increment per emitted command
    pub fn time_step(&self) -> f64 {
        self.time_step
    }
}
