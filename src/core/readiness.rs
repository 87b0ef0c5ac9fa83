// src/core/readiness.rs
// Per-sensor readiness latch. Each flag flips on the first sample of its
// stream and never flips back; commands stay gated until all three are set.

use std::fmt;

/// Sensor streams the node listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Inertial measurement unit
    Imu,
    /// Wheel odometry
    Odom,
    /// Laser range scanner
    Laser,
}

impl SensorKind {
    /// All sensor kinds, in dispatch order
    pub const ALL: [SensorKind; 3] = [SensorKind::Imu, SensorKind::Odom, SensorKind::Laser];

    /// Short name used in log file names and diagnostics
    pub fn name(self) -> &'static str {
        match self {
            SensorKind::Imu => "imu",
            SensorKind::Odom => "odom",
            SensorKind::Laser => "laser",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Readiness flags for the three sensor streams
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadinessTracker {
    imu: bool,
    odom: bool,
    laser: bool,
}

impl ReadinessTracker {
    /// All flags start cleared
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches the flag for `kind`. Returns true only on the call that set it.
    pub fn mark_ready(&mut self, kind: SensorKind) -> bool {
        let flag = match kind {
            SensorKind::Imu => &mut self.imu,
            SensorKind::Odom => &mut self.odom,
            SensorKind::Laser => &mut self.laser,
        };
        let newly_ready = !*flag;
        *flag = true;
        newly_ready
    }

    /// Whether `kind` has delivered at least one sample
    pub fn is_ready(&self, kind: SensorKind) -> bool {
        match kind {
            SensorKind::Imu => self.imu,
            SensorKind::Odom => self.odom,
            SensorKind::Laser => self.laser,
        }
    }

    /// True once every stream has delivered
    pub fn is_fully_ready(&self) -> bool {
        self.imu && self.odom && self.laser
    }

    /// Streams still holding the gate closed
    pub fn pending(&self) -> Vec<SensorKind> {
        SensorKind::ALL
            .into_iter()
            .filter(|kind| !self.is_ready(*kind))
            .collect()
    }
}
