//! Motion generation for the executor
//!
//! `profile` maps a profile and elapsed time to a velocity command;
//! `controller` decides on each tick whether a command goes out at all.

mod controller;
mod profile;

pub use controller::{ControlLoop, LoopState};
pub use profile::{MotionProfile, VelocityCommand};
