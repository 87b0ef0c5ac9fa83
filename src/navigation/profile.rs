// src/navigation/profile.rs
// Motion profiles and the pure mapping from elapsed time to a velocity command.

use crate::NodeError;
use std::fmt;
use std::str::FromStr;

/// Open-loop motion the node executes for its whole lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionProfile {
    /// Constant forward and turn rate; radius `v / w = 1.0`
    Circle,
    /// Forward speed grows with time at a fixed turn rate
    Spiral,
    /// Constant forward speed, no rotation
    AcceleratedLine,
}

/// Velocity command sent to the base each tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VelocityCommand {
    /// Forward speed (m/s)
    pub linear_x: f64,
    /// Yaw rate (rad/s)
    pub angular_z: f64,
}

impl VelocityCommand {
    /// Build a command from its two components
    pub fn new(linear_x: f64, angular_z: f64) -> Self {
        VelocityCommand { linear_x, angular_z }
    }
}

impl MotionProfile {
    /// Every selectable profile, in selector order
    pub const ALL: [MotionProfile; 3] = [
        MotionProfile::Circle,
        MotionProfile::Spiral,
        MotionProfile::AcceleratedLine,
    ];

    /// Selector literal, also used to name the sensor log files
    pub fn label(self) -> &'static str {
        match self {
            MotionProfile::Circle => "circle",
            MotionProfile::Spiral => "spiral",
            MotionProfile::AcceleratedLine => "line",
        }
    }

    /// Velocity command for this profile after `elapsed` seconds of motion.
    ///
    /// The spiral has no speed limit: `linear_x` keeps growing for as long
    /// as the node runs.
    pub fn velocity_at(self, elapsed: f64) -> VelocityCommand {
        match self {
            MotionProfile::Circle => VelocityCommand::new(1.0, 1.0),
            MotionProfile::Spiral => VelocityCommand::new(elapsed / 10.0, 1.0),
            // Named after the intended motion; the command itself is constant
            MotionProfile::AcceleratedLine => VelocityCommand::new(1.0, 0.0),
        }
    }
}

impl FromStr for MotionProfile {
    type Err = NodeError;

    /// Case-insensitive parse of a selector literal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MotionProfile::ALL
            .into_iter()
            .find(|profile| profile.label() == wanted)
            .ok_or_else(|| NodeError::UnknownMotion(wanted))
    }
}

impl fmt::Display for MotionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
