// src/core/node.rs
// The motion node: readiness gate, sensor loggers, control loop and the
// outbound command channel, with one handler per event source.

use super::readiness::ReadinessTracker;
use super::samples::{ImuSample, OdomSample, ScanSample, SensorSample};
use crate::NodeError;
use crate::navigation::{ControlLoop, MotionProfile, VelocityCommand};
use crate::recorder::SensorLoggers;
use log::{debug, info};

/// Outbound velocity command channel
#[cfg_attr(test, mockall::automock)]
pub trait CommandPublisher {
    /// Sends one command. Must not block.
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), NodeError>;
}

impl<P: CommandPublisher + ?Sized> CommandPublisher for Box<P> {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), NodeError> {
        (**self).publish(command)
    }
}

/// All node state, owned in one place and mutated only by the handlers
pub struct MotionNode<P: CommandPublisher> {
    readiness: ReadinessTracker,
    control: ControlLoop,
    loggers: SensorLoggers,
    publisher: P,
}

impl<P: CommandPublisher> MotionNode<P> {
    /// Assembles a node. `time_step` is the tick period in seconds.
    pub fn new(profile: MotionProfile, time_step: f64, loggers: SensorLoggers, publisher: P) -> Self {
        info!("Motion node configured for {} motion, tick period {}s", profile, time_step);
        MotionNode {
            readiness: ReadinessTracker::new(),
            control: ControlLoop::new(profile, time_step),
            loggers,
            publisher,
        }
    }

    /// Inertial handler
    pub fn handle_imu(&mut self, sample: &ImuSample) -> Result<(), NodeError> {
        self.record(sample)
    }

    /// Odometry handler
    pub fn handle_odom(&mut self, sample: &OdomSample) -> Result<(), NodeError> {
        self.record(sample)
    }

    /// Ranging handler
    pub fn handle_scan(&mut self, sample: &ScanSample) -> Result<(), NodeError> {
        self.record(sample)
    }

    // Marks the stream ready, logs the row, then reports a bad stamp.
    // The row is written even when the stamp is unusable.
    fn record<T: SensorSample>(&mut self, sample: &T) -> Result<(), NodeError> {
        if self.readiness.mark_ready(T::KIND) {
            info!("First {} sample received", T::KIND);
            if self.readiness.is_fully_ready() {
                info!("All sensor streams are live");
            }
        }
        self.loggers.get_mut(T::KIND).log(&sample.to_row())?;
        sample.check_stamp().map(|_| ())
    }

    /// Timer handler. Returns the command that went out, if any.
    pub fn handle_tick(&mut self) -> Result<Option<VelocityCommand>, NodeError> {
        let Some(command) = self.control.tick(&self.readiness) else {
            return Ok(None);
        };
        debug!(
            "cmd_vel #{}: linear_x={:.3}, angular_z={:.3}",
            self.control.ticks_emitted(),
            command.linear_x,
            command.angular_z
        );
        self.publisher.publish(&command)?;
        Ok(Some(command))
    }

    /// Readiness flags
    pub fn readiness(&self) -> &ReadinessTracker {
        &self.readiness
    }

    /// Control loop state
    pub fn control(&self) -> &ControlLoop {
        &self.control
    }

    /// Sensor loggers
    pub fn loggers(&self) -> &SensorLoggers {
        &self.loggers
    }

    /// Outbound channel
    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}
