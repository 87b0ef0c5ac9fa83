// src/core/samples.rs
// Transport-neutral sensor samples and their conversion to log rows.

use super::readiness::SensorKind;
use crate::NodeError;
use crate::recorder::Field;
use nalgebra::{Quaternion, UnitQuaternion};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Header capture time as carried by ROS messages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stamp {
    /// Whole seconds since the epoch
    pub sec: i32,
    /// Nanoseconds within the second
    pub nanosec: u32,
}

impl Stamp {
    /// Creates a stamp from its two header fields
    pub fn new(sec: i32, nanosec: u32) -> Self {
        Stamp { sec, nanosec }
    }

    /// Total nanoseconds, or `None` for a negative or denormalised stamp
    pub fn to_nanos(self) -> Option<u64> {
        if self.sec < 0 || u64::from(self.nanosec) >= NANOS_PER_SEC {
            return None;
        }
        Some(self.sec as u64 * NANOS_PER_SEC + u64::from(self.nanosec))
    }
}

/// One inertial measurement
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImuSample {
    /// Linear acceleration along x (m/s^2)
    pub linear_accel_x: f64,
    /// Linear acceleration along y (m/s^2)
    pub linear_accel_y: f64,
    /// Angular velocity about z (rad/s)
    pub angular_vel_z: f64,
    /// Header stamp
    pub stamp: Option<Stamp>,
}

/// One odometry pose
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OdomSample {
    /// Position x (m)
    pub pos_x: f64,
    /// Position y (m)
    pub pos_y: f64,
    /// Heading about z (rad)
    pub yaw: f64,
    /// Header stamp
    pub stamp: Option<Stamp>,
}

/// One laser sweep
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanSample {
    /// Measured distances (m)
    pub ranges: Vec<f32>,
    /// Angle between consecutive ranges (rad)
    pub angle_increment: f32,
    /// Header stamp
    pub stamp: Option<Stamp>,
}

/// Yaw (rotation about z) of an orientation quaternion given as `(x, y, z, w)`
pub fn yaw_from_quaternion(x: f64, y: f64, z: f64, w: f64) -> f64 {
    let (_roll, _pitch, yaw) =
        UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)).euler_angles();
    yaw
}

/// Log row for a sample plus the stamp check the handler reports afterwards
pub trait SensorSample {
    /// Stream this sample belongs to
    const KIND: SensorKind;

    /// Value columns, in schema order, without the timestamp
    fn value_fields(&self) -> Vec<Field>;

    /// Header stamp, if the message carried one
    fn stamp(&self) -> Option<Stamp>;

    /// Full row: value columns followed by `timestamp_ns` (blank when unusable)
    fn to_row(&self) -> Vec<Field> {
        let mut row = self.value_fields();
        row.push(
            self.stamp_nanos()
                .map(Field::Nanos)
                .unwrap_or(Field::Missing),
        );
        row
    }

    /// Stamp in nanoseconds, if present and well formed
    fn stamp_nanos(&self) -> Option<u64> {
        self.stamp().and_then(Stamp::to_nanos)
    }

    /// `MissingTimestamp` when the stamp cannot be converted
    fn check_stamp(&self) -> Result<u64, NodeError> {
        self.stamp_nanos()
            .ok_or(NodeError::MissingTimestamp(Self::KIND))
    }
}

impl SensorSample for ImuSample {
    const KIND: SensorKind = SensorKind::Imu;

    fn value_fields(&self) -> Vec<Field> {
        vec![
            Field::Float(self.linear_accel_x),
            Field::Float(self.linear_accel_y),
            Field::Float(self.angular_vel_z),
        ]
    }

    fn stamp(&self) -> Option<Stamp> {
        self.stamp
    }
}

impl SensorSample for OdomSample {
    const KIND: SensorKind = SensorKind::Odom;

    fn value_fields(&self) -> Vec<Field> {
        vec![
            Field::Float(self.pos_x),
            Field::Float(self.pos_y),
            Field::Float(self.yaw),
        ]
    }

    fn stamp(&self) -> Option<Stamp> {
        self.stamp
    }
}

impl SensorSample for ScanSample {
    const KIND: SensorKind = SensorKind::Laser;

    fn value_fields(&self) -> Vec<Field> {
        vec![
            Field::Sequence(self.ranges.iter().map(|r| f64::from(*r)).collect()),
            Field::Float(f64::from(self.angle_increment)),
        ]
    }

    fn stamp(&self) -> Option<Stamp> {
        self.stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn stamp_converts_to_nanoseconds() {
        assert_eq!(Stamp::new(1, 5).to_nanos(), Some(1_000_000_005));
        assert_eq!(Stamp::new(0, 0).to_nanos(), Some(0));
        assert_eq!(
            Stamp::new(i32::MAX, 999_999_999).to_nanos(),
            Some(i32::MAX as u64 * NANOS_PER_SEC + 999_999_999)
        );
    }

    #[test]
    fn malformed_stamps_are_rejected() {
        assert_eq!(Stamp::new(-1, 0).to_nanos(), None);
        assert_eq!(Stamp::new(3, 1_000_000_000).to_nanos(), None);
    }

    #[rstest]
    #[case(0.0)]
    #[case(FRAC_PI_2)]
    #[case(-2.0)]
    #[case(3.0)]
    fn yaw_matches_rotation_about_z(#[case] theta: f64) {
        let (z, w) = ((theta / 2.0).sin(), (theta / 2.0).cos());
        assert_relative_eq!(yaw_from_quaternion(0.0, 0.0, z, w), theta, epsilon = 1e-9);
    }

    #[test]
    fn yaw_of_half_turn_is_pi_in_magnitude() {
        assert_relative_eq!(yaw_from_quaternion(0.0, 0.0, 1.0, 0.0).abs(), PI, epsilon = 1e-9);
    }

    #[test]
    fn row_carries_blank_timestamp_when_stamp_missing() {
        let sample = ImuSample {
            linear_accel_x: 0.5,
            ..Default::default()
        };
        let row = sample.to_row();
        assert_eq!(row.len(), 4);
        assert_eq!(row[3], Field::Missing);
        assert!(matches!(
            sample.check_stamp(),
            Err(NodeError::MissingTimestamp(SensorKind::Imu))
        ));
    }

    #[test]
    fn scan_row_keeps_ranges_as_one_column() {
        let sample = ScanSample {
            ranges: vec![1.0, 2.5],
            angle_increment: 0.25,
            stamp: Some(Stamp::new(2, 0)),
        };
        assert_eq!(
            sample.to_row(),
            vec![
                Field::Sequence(vec![1.0, 2.5]),
                Field::Float(0.25),
                Field::Nanos(2_000_000_000),
            ]
        );
    }
}
