// src/recorder/logger.rs
// Per-sensor append-only loggers with fixed schemas.

use super::csv::{CsvSink, Field, RecordSink};
use crate::NodeError;
use crate::core::SensorKind;
use crate::navigation::MotionProfile;
use log::{debug, info};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Columns of the inertial log
pub const IMU_SCHEMA: &[&str] = &["linear_accel_x", "linear_accel_y", "angular_vel_z", "timestamp_ns"];
/// Columns of the odometry log
pub const ODOM_SCHEMA: &[&str] = &["pos_x", "pos_y", "yaw", "timestamp_ns"];
/// Columns of the ranging log
pub const LASER_SCHEMA: &[&str] = &["range_samples", "angle_increment", "timestamp_ns"];

/// Appends fixed-width rows to a sink
pub struct SensorLogger<S: RecordSink = Box<dyn RecordSink>> {
    name: String,
    schema: &'static [&'static str],
    sink: S,
    rows: u64,
}

impl<S: RecordSink> SensorLogger<S> {
    /// Writes the header row and returns the logger
    pub fn new(name: impl Into<String>, schema: &'static [&'static str], mut sink: S) -> Result<Self, NodeError> {
        let name = name.into();
        sink.write_header(schema).map_err(|source| NodeError::Log {
            logger: name.clone(),
            source,
        })?;
        Ok(SensorLogger {
            name,
            schema,
            sink,
            rows: 0,
        })
    }

    /// Appends one row. The row must have exactly one cell per schema column.
    pub fn log(&mut self, row: &[Field]) -> Result<(), NodeError> {
        if row.len() != self.schema.len() {
            return Err(NodeError::SchemaMismatch {
                logger: self.name.clone(),
                expected: self.schema.len(),
                actual: row.len(),
            });
        }
        self.sink.append_row(row).map_err(|source| NodeError::Log {
            logger: self.name.clone(),
            source,
        })?;
        self.rows += 1;
        Ok(())
    }

    /// Output identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names
    pub fn schema(&self) -> &'static [&'static str] {
        self.schema
    }

    /// Rows appended since creation, header excluded
    pub fn rows_written(&self) -> u64 {
        self.rows
    }
}

/// The three sensor loggers of one run
pub struct SensorLoggers {
    /// Inertial log
    pub imu: SensorLogger,
    /// Odometry log
    pub odom: SensorLogger,
    /// Ranging log
    pub laser: SensorLogger,
}

impl fmt::Debug for SensorLoggers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorLoggers")
            .field("imu", &self.imu.name())
            .field("odom", &self.odom.name())
            .field("laser", &self.laser.name())
            .finish()
    }
}

/// File name of the log for `kind` under the given profile
pub fn log_file_name(kind: SensorKind, profile: MotionProfile) -> String {
    format!("{}_content_{}.csv", kind.name(), profile.label())
}

impl SensorLoggers {
    /// Creates `output_dir` if needed and opens one CSV file per sensor.
    /// Existing files of the same name are truncated.
    pub fn create(output_dir: &Path, profile: MotionProfile) -> Result<Self, NodeError> {
        std::fs::create_dir_all(output_dir)?;

        let open = |kind: SensorKind| -> Result<(PathBuf, Box<dyn RecordSink>), NodeError> {
            let path = output_dir.join(log_file_name(kind, profile));
            let file = File::create(&path)?;
            debug!("Opened {} log at {}", kind, path.display());
            let sink: Box<dyn RecordSink> = Box::new(CsvSink::new(BufWriter::new(file)));
            Ok((path, sink))
        };

        let (imu_path, imu) = open(SensorKind::Imu)?;
        let (odom_path, odom) = open(SensorKind::Odom)?;
        let (laser_path, laser) = open(SensorKind::Laser)?;
        let loggers = Self::from_sinks(
            (imu_path.display().to_string(), imu),
            (odom_path.display().to_string(), odom),
            (laser_path.display().to_string(), laser),
        )?;
        info!("Recording sensor logs to {}", output_dir.display());
        Ok(loggers)
    }

    /// Builds the loggers over caller-supplied sinks, each paired with its output identifier
    pub fn from_sinks(
        imu: (String, Box<dyn RecordSink>),
        odom: (String, Box<dyn RecordSink>),
        laser: (String, Box<dyn RecordSink>),
    ) -> Result<Self, NodeError> {
        Ok(SensorLoggers {
            imu: SensorLogger::new(imu.0, IMU_SCHEMA, imu.1)?,
            odom: SensorLogger::new(odom.0, ODOM_SCHEMA, odom.1)?,
            laser: SensorLogger::new(laser.0, LASER_SCHEMA, laser.1)?,
        })
    }

    /// Logger for `kind`
    pub fn get_mut(&mut self, kind: SensorKind) -> &mut SensorLogger {
        match kind {
            SensorKind::Imu => &mut self.imu,
            SensorKind::Odom => &mut self.odom,
            SensorKind::Laser => &mut self.laser,
        }
    }

    /// Rows written by the logger for `kind`
    pub fn rows_written(&self, kind: SensorKind) -> u64 {
        match kind {
            SensorKind::Imu => self.imu.rows_written(),
            SensorKind::Odom => self.odom.rows_written(),
            SensorKind::Laser => self.laser.rows_written(),
        }
    }
}
